use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the record store, the metrics engine and the session.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The backing file exists but could not be read or does not match the schema.
    #[error("Failed to read score file at {}: {reason}", path.display())]
    StorageRead { path: PathBuf, reason: String },

    /// Persisting the table (or an export) failed.
    #[error("Failed to write score file at {}: {reason}", path.display())]
    StorageWrite { path: PathBuf, reason: String },

    /// An aggregate was requested over zero records.
    #[error("No student records yet")]
    EmptyTable,

    /// Required identifying fields were missing on submission.
    #[error("Invalid record: {}", .0.join(", "))]
    Validation(Vec<String>),
}

impl ScoreError {
    pub(crate) fn read(path: &std::path::Path, reason: impl ToString) -> Self {
        ScoreError::StorageRead {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: &std::path::Path, reason: impl ToString) -> Self {
        ScoreError::StorageWrite {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
