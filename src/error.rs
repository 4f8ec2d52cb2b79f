// Error types for the agent stat read path.

use thiserror::Error;

/// Failure surfaced by a range-scan store. Propagated to callers unmodified.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("store query failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to decode row {row}: {message}")]
    Decode { row: usize, message: String },
    #[error("failed to encode cell: {0}")]
    Encode(String),
}

#[derive(Debug, Error)]
pub enum StatError {
    /// Rejected before any store interaction.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl StatError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, StatError::InvalidArgument(_))
    }
}
