//! Report error types.

use thiserror::Error;

use crate::ads::models::AdvertisementId;

use super::models::ReportId;

/// Report errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Report not found
    #[error("Report {0} not found")]
    ReportNotFound(ReportId),

    /// Reported advertisement not found
    #[error("Advertisement {0} not found")]
    AdvertisementNotFound(AdvertisementId),

    /// Caller lacks the staff role
    #[error("Only staff may mark reports as read")]
    Forbidden,

    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ReportError {
    /// Get a client-safe error message that doesn't leak internal details.
    pub fn client_message(&self) -> String {
        match self {
            ReportError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
