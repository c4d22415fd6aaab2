//! Account API handlers.
//!
//! This module provides HTTP REST endpoints for the two-step OTP login flow:
//! - Signup with username, password, and nested account details
//! - Login with username/password, which issues a one-time code
//! - OTP verification, which establishes the session
//! - Logout, profile retrieval, and account updates
//!
//! All endpoints return JSON responses with either the requested data or an
//! error message.
//!
//! # Examples
//!
//! Sign up:
//! ```bash
//! curl -X POST http://localhost:8000/api/account/signup \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "seller_1", "password": "StrongPass123", "account": {"phone_number": "09120000000"}}'
//! ```
//!
//! Login (step one):
//! ```bash
//! curl -X POST http://localhost:8000/api/account/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "seller_1", "password": "StrongPass123"}'
//! ```

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adboard::auth::{AccountInfo, AccountUpdate, AuthError, Identity, Profile, SignupRequest};

use super::middleware::SessionToken;
use super::{AppState, ErrorResponse};
use crate::logging;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpPayload {
    pub username: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub profile: Profile,
}

/// Map an auth error to its HTTP status.
///
/// Database and hashing failures are server errors; everything the client
/// caused maps to 400/401/404. OTP rejections deliberately share one
/// message regardless of the cause.
fn auth_error(e: &AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        AuthError::Database(_) | AuthError::HashingFailed => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::AuthenticationFailed | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
        AuthError::UserNotFound => StatusCode::NOT_FOUND,
        AuthError::InvalidOtp
        | AuthError::UsernameTaken
        | AuthError::PhoneNumberTaken
        | AuthError::InvalidUsername(_)
        | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.client_message(),
        }),
    )
}

/// Register a new user with its nested account.
///
/// # Response
///
/// On success, returns `201 Created` with the new profile. Signup does not
/// log the user in; the two-step login flow still applies.
///
/// # Errors
///
/// - `400 Bad Request`: Username taken, phone number taken, weak password,
///   or invalid username
/// - `500 Internal Server Error`: Server error during registration
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Profile>), (StatusCode, Json<ErrorResponse>)> {
    match state.auth_manager.signup(payload).await {
        Ok(profile) => Ok((StatusCode::CREATED, Json(profile))),
        Err(e) => Err(auth_error(&e)),
    }
}

/// First login step: check the password and issue a one-time code.
///
/// The code itself never appears in the response; it is handed to the
/// delivery channel out of band. The response only acknowledges that a
/// code was issued.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown username or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.auth_manager.login(&payload.username, &payload.password).await {
        Ok(code) => {
            // Delivery is an external concern; surface the code only to
            // operators running with debug logging.
            tracing::debug!(username = %payload.username, code = %code, "OTP issued");
            Ok(Json(MessageResponse {
                message: "A one-time code has been sent".to_string(),
            }))
        }
        Err(e) => {
            logging::log_security_event(
                "failed_login",
                None,
                None,
                &format!("Login failed for {}", payload.username),
            );
            Err(auth_error(&e))
        }
    }
}

/// Second login step: trade a valid one-time code for a session.
///
/// # Response
///
/// On success, returns `200 OK` with the session token, its expiry, and
/// the caller's profile. The token goes into the `Authorization: Bearer`
/// header on subsequent requests.
///
/// # Errors
///
/// - `400 Bad Request`: Missing, expired, mismatched, or already used code
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpPayload>,
) -> Result<Json<SessionResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .auth_manager
        .verify_otp(&payload.username, &payload.code)
        .await
    {
        Ok((profile, session)) => Ok(Json(SessionResponse {
            token: session.token,
            expires_at: session.expires_at,
            profile,
        })),
        Err(e) => {
            logging::log_security_event(
                "failed_otp",
                None,
                None,
                &format!("OTP verification failed for {}", payload.username),
            );
            Err(auth_error(&e))
        }
    }
}

/// Logout and delete the session the request arrived on.
///
/// The token stops working immediately; a subsequent `/me` with the same
/// token gets `401 Unauthorized`.
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.auth_manager.logout(&token.0).await {
        Ok(()) => Ok(Json(MessageResponse {
            message: "Logged out".to_string(),
        })),
        Err(e) => Err(auth_error(&e)),
    }
}

/// Fetch the caller's profile, nested account included.
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Profile>, (StatusCode, Json<ErrorResponse>)> {
    match state.auth_manager.me(identity.user_id).await {
        Ok(profile) => Ok(Json(profile)),
        Err(e) => Err(auth_error(&e)),
    }
}

/// Update the caller's account. Only provided fields change.
///
/// # Errors
///
/// - `400 Bad Request`: Phone number already belongs to another account
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<AccountInfo>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .auth_manager
        .update_account(identity.user_id, payload)
        .await
    {
        Ok(account) => Ok(Json(account)),
        Err(e) => Err(auth_error(&e)),
    }
}
