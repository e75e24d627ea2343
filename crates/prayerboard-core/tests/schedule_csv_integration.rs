//! Schedule file round trips through the store and the engine.

use chrono::NaiveDate;
use indoc::indoc;
use prayerboard_core::schedule::read_schedule;
use prayerboard_core::storage::{backup_path, load_schedule, save_schedule};
use prayerboard_core::{AlertEngine, CoreError, Event, IngestError, Prayer, ScheduleStore};
use std::fs;
use tempfile::TempDir;

const TABLE: &str = indoc! {"
    \u{feff}Tarikh Miladi,Tarikh Hijri,Hari,Imsak,Subuh,Syuruk,Zohor,Asar,Maghrib,Isyak
    16/10/2026,4 Jamadilawal 1448,Jumaat,5:45 AM,5:55 AM,7:07 AM,1:11 PM,4:21 PM,7:15 PM,8:24 PM
    17/10/2026,5 Jamadilawal 1448,Sabtu,05:45,05:55,07:07,13:10,16:20,19:14,20:23
    32/10/2026,bad,row,,,,,,,
"};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
}

#[test]
fn load_into_store_and_drive_engine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prayer_times.csv");
    fs::write(&path, TABLE).unwrap();

    let rows = load_schedule(&path).unwrap();
    assert_eq!(rows.len(), 2, "bad-date row is skipped");

    let store = ScheduleStore::default();
    store.replace_all(rows);
    assert_eq!(store.len(), 2);

    let sat = store.find(date(17)).unwrap();
    assert_eq!(sat.weekday_name, "Sabtu");
    assert_eq!(sat.time(Prayer::Zohor), Some("13:10"));

    let mut engine = AlertEngine::default();
    let event = engine
        .tick(&store, date(17).and_hms_opt(13, 10, 0).unwrap())
        .unwrap();
    match event {
        Event::AlertRaised { key, message, .. } => {
            assert_eq!(key, "Zohor_azan");
            assert_eq!(message, "ZOHOR AZAN IS NOW");
        }
        other => panic!("expected a raise, got {other:?}"),
    }
}

#[test]
fn rejected_upload_leaves_store_untouched() {
    let store = ScheduleStore::new(read_schedule(TABLE.as_bytes(), "good.csv").unwrap());

    let missing_asar = indoc! {"
        Tarikh Miladi,Tarikh Hijri,Hari,Imsak,Subuh,Syuruk,Zohor,Maghrib,Isyak
        18/10/2026,6 Jamadilawal 1448,Ahad,5:45 AM,5:55 AM,7:07 AM,1:11 PM,7:15 PM,8:24 PM
    "};
    let err = read_schedule(missing_asar.as_bytes(), "upload.csv").unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn(ref col) if col == "Asar"));
    assert!(err.to_string().contains("Asar"));

    // Only a successful parse reaches replace_all.
    assert_eq!(store.len(), 2);
    assert!(store.find(date(18)).is_none());
}

#[test]
fn header_only_file_serves_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prayer_times.csv");
    fs::write(
        &path,
        "Tarikh Miladi,Tarikh Hijri,Hari,Imsak,Subuh,Syuruk,Zohor,Asar,Maghrib,Isyak\n",
    )
    .unwrap();

    let store = ScheduleStore::new(load_schedule(&path).unwrap());
    assert!(store.is_empty());
    let entry = store.find(date(16)).unwrap();
    assert!(entry.placeholder);
    assert!(Prayer::ALL.iter().all(|&p| entry.time(p) == Some("N/A")));
}

#[test]
fn save_export_reload_keeps_rows() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("upload.csv");
    fs::write(&source, TABLE).unwrap();
    let rows = load_schedule(&source).unwrap();

    let saved = dir.path().join("data").join("prayer_times.csv");
    save_schedule(&saved, &rows).unwrap();
    save_schedule(&saved, &rows).unwrap();
    assert!(!backup_path(&saved).exists());

    let reloaded = load_schedule(&saved).unwrap();
    assert_eq!(reloaded, rows);

    let header = fs::read_to_string(&saved).unwrap();
    assert!(header.starts_with(
        "Tarikh Miladi,Tarikh Hijri,Hari,Imsak,Subuh,Syuruk,Zohor,Asar,Maghrib,Isyak"
    ));
    assert!(header.contains("16/10/2026"));
}

#[test]
fn unreadable_file_surfaces_as_error() {
    let dir = TempDir::new().unwrap();
    // A directory where the file should be.
    let path = dir.path().join("prayer_times.csv");
    fs::create_dir(&path).unwrap();

    let err = load_schedule(&path).unwrap_err();
    assert!(matches!(err, CoreError::Io(_) | CoreError::Ingest(_)));
}
