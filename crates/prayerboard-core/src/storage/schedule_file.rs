//! On-disk schedule file with a backup-then-restore write discipline.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::error::{CoreError, PersistError};
use crate::schedule::{read_schedule, write_schedule, ScheduleEntry};

/// `prayer_times.csv` -> `prayer_times.csv.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Load the schedule file. A missing file is an empty schedule.
pub fn load_schedule(path: &Path) -> Result<Vec<ScheduleEntry>, CoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no saved prayer times found");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let entries = read_schedule(BufReader::new(file), &path.display().to_string())?;
    info!(path = %path.display(), rows = entries.len(), "prayer times loaded");
    Ok(entries)
}

/// Write `entries` to `path`.
///
/// An existing file is copied to [`backup_path`] first. On success the
/// backup is removed; on failure it is copied back over `path`.
pub fn save_schedule(path: &Path, entries: &[ScheduleEntry]) -> Result<(), PersistError> {
    save_with(path, |target| {
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let file = File::create(target).map_err(|e| e.to_string())?;
        write_schedule(file, entries).map_err(|e| e.to_string())
    })
}

fn save_with<F>(path: &Path, write: F) -> Result<(), PersistError>
where
    F: FnOnce(&Path) -> Result<(), String>,
{
    let backup = backup_path(path);
    let had_previous = path.is_file();
    if had_previous {
        fs::copy(path, &backup).map_err(|source| PersistError::BackupFailed {
            path: path.to_path_buf(),
            source,
        })?;
    }

    match write(path) {
        Ok(()) => {
            if had_previous {
                if let Err(e) = fs::remove_file(&backup) {
                    warn!(backup = %backup.display(), "could not remove schedule backup: {e}");
                }
            }
            info!(path = %path.display(), "prayer times saved");
            Ok(())
        }
        Err(message) => {
            let restored = had_previous && restore(&backup, path);
            error!(path = %path.display(), restored, "failed to save prayer times: {message}");
            Err(PersistError::WriteFailed {
                path: path.to_path_buf(),
                message,
                restored,
            })
        }
    }
}

fn restore(backup: &Path, path: &Path) -> bool {
    match fs::copy(backup, path) {
        Ok(_) => {
            let _ = fs::remove_file(backup);
            true
        }
        Err(e) => {
            error!(backup = %backup.display(), "restoring schedule backup failed: {e}");
            false
        }
    }
}
