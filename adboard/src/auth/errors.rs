//! Authentication error types.

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Bad credentials. One variant for both unknown username and wrong
    /// password so callers cannot probe which usernames exist.
    #[error("Invalid username or password")]
    AuthenticationFailed,

    /// Missing, expired, or mismatched OTP. Deliberately a single variant:
    /// the failure cause must not be distinguishable by callers.
    #[error("Invalid or expired OTP")]
    InvalidOtp,

    /// No valid session where one is required
    #[error("Authentication required")]
    Unauthorized,

    /// Username already exists
    #[error("Username already exists")]
    UsernameTaken,

    /// Phone number already registered to another account
    #[error("Phone number already in use")]
    PhoneNumberTaken,

    /// Invalid username format
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Password too weak
    #[error("Password too weak: {0}")]
    WeakPassword(String),

    /// User not found
    #[error("User not found")]
    UserNotFound,
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive
    /// information about the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            // Sanitize database errors - don't expose SQL details
            AuthError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_are_sanitized() {
        let err = AuthError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn otp_message_does_not_name_a_cause() {
        // Expired and mismatched codes surface through the same variant, so
        // there is exactly one externally visible message shape.
        let msg = AuthError::InvalidOtp.client_message();
        assert!(!msg.to_lowercase().contains("mismatch"));
        assert!(!msg.to_lowercase().contains("pending"));
    }
}
