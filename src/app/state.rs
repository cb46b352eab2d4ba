use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarDate, DisplayedPeriod};
use crate::error::{JournalError, JournalResult};

/// Cursor state that survives restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub displayed: DisplayedPeriod,
    pub selected: CalendarDate,
}

impl SessionState {
    pub fn starting_at(today: CalendarDate) -> Self {
        Self {
            displayed: today.period(),
            selected: today,
        }
    }

    /// Reads the saved session, falling back to `today` when none is usable.
    pub fn load_or_default(path: &Path, today: CalendarDate) -> JournalResult<Self> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::starting_at(today))
            }
            Err(err) => return Err(JournalError::storage("reading session", path, err)),
        };
        match serde_json::from_slice(&raw) {
            Ok(state) => Ok(state),
            Err(err) => {
                tracing::warn!(?err, "ignoring unreadable session {}", path.display());
                Ok(Self::starting_at(today))
            }
        }
    }

    pub fn save(&self, path: &Path) -> JournalResult<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|err| JournalError::Corrupt {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| JournalError::storage("creating state dir", parent, err))?;
        }
        let tmp_path = path.with_extension("json.tmp");
        if let Err(err) = fs::write(&tmp_path, &json) {
            let _ = fs::remove_file(&tmp_path);
            return Err(JournalError::storage("writing session", tmp_path, err));
        }
        if let Err(err) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(JournalError::storage("replacing session", path, err));
        }
        Ok(())
    }
}
