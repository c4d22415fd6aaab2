//! Authentication module: accounts, two-step OTP login, and sessions.
//!
//! Login is a two-step gate. A password check issues a short-lived
//! six-digit code stored on the account; verifying that code exactly once
//! establishes an opaque database-backed session. The session token is
//! what callers present on subsequent requests, and logout deletes it.
//!
//! ## Example
//!
//! ```no_run
//! use adboard::auth::AuthManager;
//! use adboard::db::Database;
//! use chrono::Duration;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let auth = AuthManager::new(
//!         Arc::new(db.pool().clone()),
//!         "secret_pepper".to_string(),
//!         Duration::days(7),
//!     );
//!
//!     let code = auth.login("seller_1", "StrongPass123").await?;
//!     let (profile, session) = auth.verify_otp("seller_1", &code).await?;
//!     println!("{} is logged in: {}", profile.username, session.token);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod otp;

pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{
    AccountInfo, AccountUpdate, Identity, NewAccount, OtpChallenge, Profile, Role, Session,
    SignupRequest, UserId,
};
