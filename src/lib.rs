pub mod app;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod preferences;
pub mod storage;

pub use app::{Journal, SessionState};
pub use calendar::{CalendarDate, DisplayedPeriod, GridCell, Weekday};
pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use error::{JournalError, JournalResult};
pub use storage::{key_for, NoteKey, NoteStore};
