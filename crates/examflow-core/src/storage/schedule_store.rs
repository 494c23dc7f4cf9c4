//! File-backed snapshot of the pushed exam schedule.
//!
//! Hosts push schedules into the agent over its command channel; the
//! agent mirrors the last push to `schedule.json` so the data survives
//! restarts and so a separate CLI process can hand a schedule to a
//! running agent. The agent watches the file's mtime to notice pushes
//! from other processes.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::data_dir;
use crate::error::ScheduleError;
use crate::exam::ExamSchedule;

pub struct ScheduleStore {
    path: PathBuf,
}

impl ScheduleStore {
    /// Store at `~/.config/examflow/schedule.json`.
    pub fn open() -> Result<Self, std::io::Error> {
        Ok(Self {
            path: data_dir()?.join("schedule.json"),
        })
    }

    /// Store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot. A missing or corrupt file yields an empty
    /// schedule; corruption is logged.
    pub fn load(&self) -> ExamSchedule {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(schedule) => schedule,
                Err(e) => {
                    log::warn!(
                        "schedule file {} is corrupt ({e}); treating as empty",
                        self.path.display()
                    );
                    ExamSchedule::default()
                }
            },
            Err(_) => ExamSchedule::default(),
        }
    }

    /// Persist the snapshot.
    pub fn save(&self, schedule: &ExamSchedule) -> Result<(), ScheduleError> {
        let content = serde_json::to_string_pretty(schedule)
            .map_err(|e| ScheduleError::WriteFailed {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            })?;
        std::fs::write(&self.path, content).map_err(|source| ScheduleError::WriteFailed {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Last modification time of the snapshot, if it exists.
    pub fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
    }

    /// Strictly parse a user-supplied schedule file. Unlike [`load`],
    /// errors surface so a botched push is reported instead of silently
    /// emptying the schedule.
    ///
    /// [`load`]: ScheduleStore::load
    pub fn read_file(path: &Path) -> Result<ExamSchedule, ScheduleError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScheduleError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ScheduleError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}
