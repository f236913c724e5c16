//! Public error type
//!
//! Reconstruction itself never fails — every engine-level anomaly is a
//! [`crate::diag::Warning`]. These errors cover reading and decoding
//! input on behalf of a host.

use thiserror::Error;

/// Host-level FOLIO errors.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for FOLIO operations.
pub type FolioResult<T> = Result<T, FolioError>;
