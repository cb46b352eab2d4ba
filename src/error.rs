use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type JournalResult<T> = std::result::Result<T, JournalError>;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{action} {}: {source}", path.display())]
    Storage {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt data in {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
}

impl JournalError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        JournalError::InvalidArgument(message.into())
    }

    pub(crate) fn storage(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        JournalError::Storage {
            action,
            path: path.into(),
            source,
        }
    }
}
