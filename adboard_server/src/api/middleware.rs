//! Session authentication middleware for protected endpoints.
//!
//! The middleware extracts the opaque session token from the Authorization
//! header, validates it against the sessions table, and injects the caller's
//! [`Identity`] into request extensions for downstream handlers.
//!
//! # Extracting the caller
//!
//! In handler functions, extract the identity from request extensions:
//!
//! ```rust,ignore
//! use adboard::auth::Identity;
//! use axum::extract::Extension;
//!
//! async fn protected_handler(Extension(identity): Extension<Identity>) -> String {
//!     format!("Authenticated as {}", identity.username)
//! }
//! ```

use adboard::auth::Identity;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};

use super::AppState;

/// The raw session token of the current request, kept alongside the
/// identity so logout can delete the exact session it arrived on.
#[derive(Clone, Debug)]
pub struct SessionToken(pub String);

/// Pull the bearer token out of an Authorization header, if any.
fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Authentication middleware that validates session tokens.
///
/// Expects `Authorization: Bearer <token>` where the token is the opaque
/// session token returned by OTP verification.
///
/// # Behavior
///
/// - **Success**: Injects [`Identity`] and [`SessionToken`] into request
///   extensions, then calls the next handler
/// - **Missing header**: Returns `401 Unauthorized`
/// - **Invalid format**: Returns `401 Unauthorized`
/// - **Unknown or expired token**: Returns `401 Unauthorized`
pub async fn session_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = match bearer_token(request.headers()) {
        Some(t) => t.to_string(),
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    match state.auth_manager.authenticate(&token).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            request.extensions_mut().insert(SessionToken(token));
            Ok(next.run(request).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Extractor for routes that serve both anonymous and authenticated
/// callers, such as the advertisement listing. A missing Authorization
/// header yields `None`; a header with a bad token is still rejected.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequestParts<AppState> for OptionalIdentity {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(&parts.headers) {
            Some(t) => t,
            None => return Ok(OptionalIdentity(None)),
        };

        match state.auth_manager.authenticate(token).await {
            Ok(identity) => Ok(OptionalIdentity(Some(identity))),
            Err(_) => Err(StatusCode::UNAUTHORIZED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc-123"));
        assert_eq!(bearer_token(&headers), Some("abc-123"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc-123"));
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
