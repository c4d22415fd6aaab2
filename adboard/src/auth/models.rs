//! Authentication and account data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User ID type
pub type UserId = i64;

/// Role carried by an authenticated identity.
///
/// Staff bypass ownership checks and see all reports; everyone else is a
/// plain user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Staff,
}

/// Authenticated caller, resolved from a session token and passed
/// explicitly into every operation that needs authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}

/// Account details nested under a user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
}

/// Full user profile with its 1:1 account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub account: AccountInfo,
}

/// Signup request with nested account details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub account: NewAccount,
}

/// Account fields accepted at signup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAccount {
    pub phone_number: Option<String>,
}

/// Partial account update; only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
}

/// Session model backed by a row in the sessions table.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Pending OTP challenge stored on an account.
///
/// The account OTP field has two states: empty (no pending challenge) and
/// pending (code and expiry both set). Issuing replaces any pending
/// challenge; successful verification clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_staff_check() {
        let staff = Identity {
            user_id: 1,
            username: "mod".to_string(),
            role: Role::Staff,
        };
        let user = Identity {
            user_id: 2,
            username: "seller".to_string(),
            role: Role::User,
        };
        assert!(staff.is_staff());
        assert!(!user.is_staff());
    }

    #[test]
    fn signup_request_accepts_nested_account() {
        let payload = serde_json::json!({
            "username": "testuser",
            "password": "StrongPass123",
            "email": "test@example.com",
            "first_name": "Mmd",
            "last_name": "Zare",
            "account": {"phone_number": "123456789"}
        });

        let request: SignupRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.username, "testuser");
        assert_eq!(request.account.phone_number.as_deref(), Some("123456789"));
    }

    #[test]
    fn signup_request_account_is_optional() {
        let payload = serde_json::json!({
            "username": "bare",
            "password": "StrongPass123"
        });

        let request: SignupRequest = serde_json::from_value(payload).unwrap();
        assert!(request.account.phone_number.is_none());
    }
}
