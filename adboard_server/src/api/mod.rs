//! HTTP API for the adboard marketplace.
//!
//! This module provides the complete REST API for the classifieds platform.
//! It handles the two-step OTP login, advertisement CRUD with favorites,
//! categories, and the report queue.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework
//! - **Tower**: Middleware for CORS and authentication
//! - **Opaque sessions**: Database-backed bearer tokens, revoked on logout
//!
//! # Modules
//!
//! - [`account`]: Signup, two-step login, profile, and account updates
//! - [`advertisements`]: Listings, pictures, favorites, seller contact
//! - [`categories`]: Read-only category lookups
//! - [`reports`]: Filing complaints and the staff review queue
//! - [`middleware`]: Session authentication for protected endpoints
//!
//! # Endpoints Overview
//!
//! ## Account
//! - `POST /api/account/signup` - Register (public)
//! - `POST /api/account/login` - Password check, issues OTP (public)
//! - `POST /api/account/verify-otp` - Trade OTP for a session (public)
//! - `POST /api/account/logout` - Delete the current session
//! - `GET  /api/account/me` - Caller's profile
//! - `PUT/PATCH /api/account/update` - Update account fields
//!
//! ## Advertisements
//! - `GET    /api/advertisement` - List with filters (public)
//! - `GET    /api/advertisement/{id}` - Detail with pictures (public)
//! - `POST   /api/advertisement` - Create
//! - `PUT    /api/advertisement/{id}` - Update
//! - `PATCH  /api/advertisement/{id}` - Partial update
//! - `DELETE /api/advertisement/{id}` - Delete
//! - `POST   /api/advertisement/{id}/favorite` - Add to favorites
//! - `DELETE /api/advertisement/{id}/favorite` - Remove from favorites
//! - `GET    /api/advertisement/{id}/owner-phone` - Seller contact
//!
//! ## Categories
//! - `GET /api/category` - List (public)
//! - `GET /api/category/{id}` - Detail (public)
//!
//! ## Reports
//! - `POST  /api/report` - File a report
//! - `GET   /api/report` - List visible reports
//! - `PATCH /api/report/{id}` - Flip the is-read flag (staff)
//!
//! ## Health Check
//! - `GET /health` - Server health status
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod account;
pub mod advertisements;
pub mod categories;
pub mod middleware;
pub mod reports;
pub mod request_id;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use adboard::{ads::AdsManager, auth::AuthManager, reports::ReportManager};

/// Error payload shared by every handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request (cheap due to Arc wrappers) and
/// provides access to the domain managers.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub ads_manager: Arc<AdsManager>,
    pub report_manager: Arc<ReportManager>,
    pub pool: Arc<PgPool>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// Constructs an Axum router with the account, advertisement, category,
/// and report endpoints configured. Applies request ID and CORS middleware
/// to all routes.
pub fn create_router(state: AppState) -> Router {
    let api_routes = create_api_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create the `/api` router.
///
/// Public routes skip the session middleware entirely; the advertisement
/// listing handles optional authentication itself so anonymous and
/// logged-in viewers share one endpoint.
fn create_api_router(state: AppState) -> Router<AppState> {
    // Public routes (no authentication middleware)
    let public_routes = Router::new()
        .route("/account/signup", post(account::signup))
        .route("/account/login", post(account::login))
        .route("/account/verify-otp", post(account::verify_otp))
        .route("/advertisement", get(advertisements::list))
        .route("/advertisement/{ad_id}", get(advertisements::get))
        .route("/category", get(categories::list))
        .route("/category/{category_id}", get(categories::get));

    // Protected routes (require authentication middleware)
    let protected_routes = Router::new()
        .route("/account/logout", post(account::logout))
        .route("/account/me", get(account::me))
        .route(
            "/account/update",
            axum::routing::put(account::update).patch(account::update),
        )
        .route("/advertisement", post(advertisements::create))
        .route(
            "/advertisement/{ad_id}",
            axum::routing::put(advertisements::update)
                .patch(advertisements::update)
                .delete(advertisements::delete),
        )
        .route(
            "/advertisement/{ad_id}/favorite",
            post(advertisements::add_favorite).delete(advertisements::remove_favorite),
        )
        .route(
            "/advertisement/{ad_id}/owner-phone",
            get(advertisements::owner_contact),
        )
        .route("/report", post(reports::create).get(reports::list))
        .route("/report/{report_id}", patch(reports::set_read))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_auth,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Checks database connectivity with a trivial query and returns JSON with
/// the health status and an appropriate HTTP status code.
///
/// # Response
///
/// Returns `200 OK` if the database responds, or `503 Service Unavailable`
/// otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    // Check database connectivity
    let db_healthy = sqlx::query("SELECT 1")
        .fetch_one(&*state.pool)
        .await
        .is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header::AUTHORIZATION, Method, Request};
    use chrono::Duration;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    // A pool that never connects; these tests only exercise routing and
    // the auth gate, which reject requests before any query runs.
    fn test_state() -> AppState {
        let pool = Arc::new(
            PgPoolOptions::new()
                .connect_lazy("postgres://unused@localhost/unused")
                .expect("lazy pool"),
        );
        AppState {
            auth_manager: Arc::new(AuthManager::new(
                pool.clone(),
                "test_pepper_test_pepper".to_string(),
                Duration::days(7),
            )),
            ads_manager: Arc::new(AdsManager::new(pool.clone())),
            report_manager: Arc::new(ReportManager::new(pool.clone())),
            pool,
        }
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_token() {
        let app = create_router(test_state());

        for (method, uri) in [
            (Method::POST, "/api/account/logout"),
            (Method::GET, "/api/account/me"),
            (Method::PATCH, "/api/account/update"),
            (Method::POST, "/api/advertisement"),
            (Method::DELETE, "/api/advertisement/1"),
            (Method::POST, "/api/advertisement/1/favorite"),
            (Method::DELETE, "/api/advertisement/1/favorite"),
            (Method::GET, "/api/advertisement/1/owner-phone"),
            (Method::POST, "/api/report"),
            (Method::GET, "/api/report"),
            (Method::PATCH, "/api/report/1"),
        ] {
            let response = app
                .clone()
                .oneshot(request(method.clone(), uri))
                .await
                .expect("response");
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri} should require a session"
            );
        }
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let app = create_router(test_state());

        let req = Request::builder()
            .method(Method::GET)
            .uri("/api/account/me")
            .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .expect("request");

        let response = app.oneshot(req).await.expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = create_router(test_state());
        let response = app
            .oneshot(request(Method::GET, "/api/nope"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn category_is_read_only() {
        let app = create_router(test_state());
        let response = app
            .oneshot(request(Method::DELETE, "/api/category/1"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn login_requires_a_json_body() {
        use http_body_util::BodyExt;

        let app = create_router(test_state());
        let response = app
            .oneshot(request(Method::POST, "/api/account/login"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let body = response.into_body().collect().await.expect("body").to_bytes();
        assert!(!body.is_empty(), "rejection should explain itself");
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let app = create_router(test_state());
        let response = app
            .oneshot(request(Method::GET, "/api/nope"))
            .await
            .expect("response");
        assert!(response.headers().contains_key(request_id::REQUEST_ID_HEADER));
    }
}
