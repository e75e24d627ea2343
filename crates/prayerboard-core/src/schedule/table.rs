//! Tabular (CSV) schedule ingestion and export.
//!
//! The header row is validated once at the boundary: every column in
//! [`COLUMNS`] must be present or the whole upload is rejected. Row-level
//! problems are skipped with a warning instead.

use std::collections::HashMap;
use std::io;
use tracing::{debug, warn};

use super::entry::{parse_date, ScheduleEntry};
use crate::error::IngestError;
use crate::prayer::Prayer;

pub const COL_GREGORIAN: &str = "Tarikh Miladi";
pub const COL_HIJRI: &str = "Tarikh Hijri";
pub const COL_WEEKDAY: &str = "Hari";

/// Required headers, in export order.
pub const COLUMNS: [&str; 10] = [
    COL_GREGORIAN,
    COL_HIJRI,
    COL_WEEKDAY,
    "Imsak",
    "Subuh",
    "Syuruk",
    "Zohor",
    "Asar",
    "Maghrib",
    "Isyak",
];

/// Read a whole schedule table. `source_name` only feeds error messages.
pub fn read_schedule<R: io::Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<ScheduleEntry>, IngestError> {
    let unreadable = |source| IngestError::Unreadable {
        source_name: source_name.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(unreadable)?.clone();
    if headers.is_empty() {
        return Err(IngestError::Empty);
    }

    let positions: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_string(), i))
        .collect();

    let mut index = HashMap::with_capacity(COLUMNS.len());
    for column in COLUMNS {
        let pos = positions
            .get(column)
            .ok_or_else(|| IngestError::MissingColumn(column.to_string()))?;
        index.insert(column, *pos);
    }

    let mut entries = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        // Header is line 1.
        let line = row_idx + 2;
        let record = match csv::StringRecord::from_byte_record(record.map_err(unreadable)?) {
            Ok(record) => record,
            Err(e) => {
                warn!(line, "skipping row that is not valid UTF-8: {}", e.utf8_error());
                continue;
            }
        };
        let field = |column: &str| {
            index
                .get(column)
                .and_then(|&i| record.get(i))
                .unwrap_or_default()
        };

        let raw_date = field(COL_GREGORIAN);
        let Some(date) = parse_date(raw_date) else {
            warn!(line, date = raw_date, "skipping row with unparsable date");
            continue;
        };

        let mut entry = ScheduleEntry::new(date, field(COL_HIJRI), field(COL_WEEKDAY));
        for prayer in Prayer::ALL {
            entry.set_time(prayer, field(prayer.name()));
        }
        entries.push(entry);
    }

    debug!(rows = entries.len(), source = source_name, "schedule table read");
    Ok(entries)
}

/// Write entries with the same ten columns. Absent times are written empty.
pub fn write_schedule<W: io::Write>(writer: W, entries: &[ScheduleEntry]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(COLUMNS)?;
    for entry in entries {
        let mut record = vec![
            entry.date_text(),
            entry.hijri_date.clone(),
            entry.weekday_name.clone(),
        ];
        record.extend(
            Prayer::ALL
                .into_iter()
                .map(|p| entry.time(p).unwrap_or_default().to_string()),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use indoc::indoc;

    const TABLE: &str = indoc! {"
        Tarikh Miladi,Tarikh Hijri,Hari,Imsak,Subuh,Syuruk,Zohor,Asar,Maghrib,Isyak
        16/10/2026,4 Jamadilawal 1448,Jumaat,5:45 AM,5:55 AM,7:07 AM,1:11 PM,4:21 PM,7:15 PM,8:24 PM
        17/10/2026,5 Jamadilawal 1448,Sabtu,05:45,05:55,07:07,13:11,16:21,19:15,20:24
    "};

    #[test]
    fn reads_rows_in_order() {
        let entries = read_schedule(TABLE.as_bytes(), "test").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].gregorian_date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(entries[0].weekday_name, "Jumaat");
        assert_eq!(entries[0].time(Prayer::Zohor), Some("1:11 PM"));
        assert_eq!(entries[1].time(Prayer::Isyak), Some("20:24"));
    }

    #[test]
    fn missing_column_rejects_everything() {
        let table = "Tarikh Miladi,Tarikh Hijri,Hari,Imsak,Subuh,Syuruk,Asar,Maghrib,Isyak\n\
                     16/10/2026,x,y,1,2,3,4,5,6\n";
        let err = read_schedule(table.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(ref c) if c == "Zohor"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(read_schedule("".as_bytes(), "test"), Err(IngestError::Empty)));
    }

    #[test]
    fn header_only_is_zero_rows() {
        let header = COLUMNS.join(",");
        assert!(read_schedule(header.as_bytes(), "test").unwrap().is_empty());
    }

    #[test]
    fn bad_dates_are_skipped_and_blank_times_absent() {
        let table = indoc! {"
            \u{feff}Tarikh Miladi , Tarikh Hijri,Hari,Imsak,Subuh,Syuruk,Zohor,Asar,Maghrib,Isyak
            not-a-date,x,y,1,2,3,4,5,6,7
            18/10/2026,6 Jamadilawal 1448,Ahad,,05:55,07:07,13:11,16:21,19:15
        "};
        let entries = read_schedule(table.as_bytes(), "test").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].time(Prayer::Imsak), None);
        assert_eq!(entries[0].time(Prayer::Isyak), None);
        assert_eq!(entries[0].time(Prayer::Maghrib), Some("19:15"));
    }

    #[test]
    fn undecodable_row_is_skipped() {
        let mut table = COLUMNS.join(",").into_bytes();
        table.extend_from_slice(b"\n16/10/2026,4 Jamadilawal \xff1448,Jumaat,,,,1:11 PM,,,\n");
        table.extend_from_slice(b"17/10/2026,5 Jamadilawal 1448,Sabtu,,,,13:11,,,\n");

        let entries = read_schedule(table.as_slice(), "test").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].weekday_name, "Sabtu");
        assert_eq!(entries[0].time(Prayer::Zohor), Some("13:11"));
    }

    #[test]
    fn columns_may_be_reordered() {
        let table = indoc! {"
            Isyak,Maghrib,Asar,Zohor,Syuruk,Subuh,Imsak,Hari,Tarikh Hijri,Tarikh Miladi
            20:24,19:15,16:21,13:11,07:07,05:55,05:45,Jumaat,4 Jamadilawal 1448,16/10/2026
        "};
        let entries = read_schedule(table.as_bytes(), "test").unwrap();
        assert_eq!(entries[0].time(Prayer::Zohor), Some("13:11"));
        assert_eq!(entries[0].hijri_date, "4 Jamadilawal 1448");
    }

    #[test]
    fn export_uses_canonical_column_order() {
        let entries = read_schedule(TABLE.as_bytes(), "test").unwrap();
        let mut out = Vec::new();
        write_schedule(&mut out, &entries).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(COLUMNS.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some("16/10/2026,4 Jamadilawal 1448,Jumaat,5:45 AM,5:55 AM,7:07 AM,1:11 PM,4:21 PM,7:15 PM,8:24 PM")
        );
    }
}
