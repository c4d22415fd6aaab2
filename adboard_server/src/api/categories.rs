//! Category API handlers. Categories are read-only over HTTP; they are
//! maintained directly in the database.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use adboard::ads::{AdsError, Category, CategoryId};

use super::{AppState, ErrorResponse};

fn category_error(e: &AdsError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        AdsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AdsError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.client_message(),
        }),
    )
}

/// List all categories.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, (StatusCode, Json<ErrorResponse>)> {
    match state.ads_manager.list_categories().await {
        Ok(categories) => Ok(Json(categories)),
        Err(e) => Err(category_error(&e)),
    }
}

/// Fetch one category.
pub async fn get(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Category>, (StatusCode, Json<ErrorResponse>)> {
    match state.ads_manager.get_category(category_id).await {
        Ok(category) => Ok(Json(category)),
        Err(e) => Err(category_error(&e)),
    }
}
