//! Error types. None of these reach the user as a failure: store errors are logged and
//! swallowed, input errors are shown next to the add form.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the durable key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Rejections from the add-task form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{0}' is not a date, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("due date {date} is before today ({today})")]
    PastDate { date: NaiveDate, today: NaiveDate },
}
