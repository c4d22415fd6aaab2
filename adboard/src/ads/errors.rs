//! Advertisement error types.

use thiserror::Error;

use super::models::{AdvertisementId, CategoryId};

/// Advertisement errors
#[derive(Debug, Error)]
pub enum AdsError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Advertisement not found
    #[error("Advertisement {0} not found")]
    AdvertisementNotFound(AdvertisementId),

    /// Category not found
    #[error("Category {0} not found")]
    CategoryNotFound(CategoryId),

    /// Author has no phone number on file; reported as not-found rather
    /// than as an empty value.
    #[error("No phone number on file for this advertisement's owner")]
    PhoneNotOnFile,

    /// Caller is neither the author nor staff
    #[error("You do not have permission to modify this advertisement")]
    Forbidden,

    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AdsError {
    /// Get a client-safe error message that doesn't leak internal details.
    pub fn client_message(&self) -> String {
        match self {
            AdsError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for advertisement operations
pub type AdsResult<T> = Result<T, AdsError>;
