//! Report API handlers.
//!
//! Any authenticated user may file a report against an advertisement.
//! Listing is scoped: staff see the whole queue, everyone else sees only
//! their own reports. Flipping the is-read flag is staff-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use adboard::auth::Identity;
use adboard::reports::{NewReport, Report, ReportError, ReportId};

use super::{AppState, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct SetReadPayload {
    pub is_read: bool,
}

/// Map a report error to its HTTP status.
fn report_error(e: &ReportError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        ReportError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ReportError::ReportNotFound(_) | ReportError::AdvertisementNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        ReportError::Forbidden => StatusCode::FORBIDDEN,
        ReportError::Validation(_) => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.client_message(),
        }),
    )
}

/// File a report against an advertisement.
///
/// # Errors
///
/// - `400 Bad Request`: Empty reason
/// - `404 Not Found`: Unknown advertisement
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<NewReport>,
) -> Result<(StatusCode, Json<Report>), (StatusCode, Json<ErrorResponse>)> {
    match state.report_manager.create(&identity, payload).await {
        Ok(report) => Ok((StatusCode::CREATED, Json(report))),
        Err(e) => Err(report_error(&e)),
    }
}

/// List reports visible to the caller, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Report>>, (StatusCode, Json<ErrorResponse>)> {
    match state.report_manager.list(&identity).await {
        Ok(reports) => Ok(Json(reports)),
        Err(e) => Err(report_error(&e)),
    }
}

/// Set a report's is-read flag. Staff only.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not staff
/// - `404 Not Found`: Unknown report
pub async fn set_read(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(report_id): Path<ReportId>,
    Json(payload): Json<SetReadPayload>,
) -> Result<Json<Report>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .report_manager
        .set_read(&identity, report_id, payload.is_read)
        .await
    {
        Ok(report) => Ok(Json(report)),
        Err(e) => Err(report_error(&e)),
    }
}
