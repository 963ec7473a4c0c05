//! Error types for the projection engine

use thiserror::Error;

/// Errors surfaced by input validation and scenario loading.
///
/// Degenerate arithmetic (zero cash invested, zero debt service, an IRR that
/// does not cross zero) is not an error: those cases come back as `None`
/// in the results.
#[derive(Debug, Error)]
pub enum RoiError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RoiError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RoiError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type RoiResult<T> = Result<T, RoiError>;
