//! Advertisement API handlers.
//!
//! Listings and detail views are public; creating, updating, deleting,
//! favoriting, and the seller's phone number require a session. The
//! listing adapts to the caller: authenticated viewers get a per-row
//! favorite flag and may filter down to their own advertisements.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use adboard::ads::{
    AdFilter, Advertisement, AdvertisementId, AdvertisementSummary, AdvertisementUpdate, AdsError,
    NewAdvertisement, OwnerContact,
};
use adboard::auth::Identity;

use super::middleware::OptionalIdentity;
use super::{AppState, ErrorResponse};

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub message: String,
}

/// Map an ads error to its HTTP status.
fn ads_error(e: &AdsError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        AdsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AdsError::AdvertisementNotFound(_)
        | AdsError::CategoryNotFound(_)
        | AdsError::PhoneNotOnFile => StatusCode::NOT_FOUND,
        AdsError::Forbidden => StatusCode::FORBIDDEN,
        AdsError::Validation(_) => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.client_message(),
        }),
    )
}

/// List advertisements, filtered and ordered by query parameters.
///
/// # Query Parameters
///
/// - `search`: substring match on title and description
/// - `min_price` / `max_price`: inclusive price bounds
/// - `category`: category ID
/// - `mine`: restrict to the caller's own listings (authenticated only)
/// - `ordering`: `newest`, `oldest`, `price_asc`, or `price_desc`
pub async fn list(
    State(state): State<AppState>,
    OptionalIdentity(viewer): OptionalIdentity,
    Query(filter): Query<AdFilter>,
) -> Result<Json<Vec<AdvertisementSummary>>, (StatusCode, Json<ErrorResponse>)> {
    let viewer_id = viewer.as_ref().map(|identity| identity.user_id);
    match state.ads_manager.list(&filter, viewer_id).await {
        Ok(summaries) => Ok(Json(summaries)),
        Err(e) => Err(ads_error(&e)),
    }
}

/// Fetch one advertisement with its pictures in order.
pub async fn get(
    State(state): State<AppState>,
    Path(ad_id): Path<AdvertisementId>,
) -> Result<Json<Advertisement>, (StatusCode, Json<ErrorResponse>)> {
    match state.ads_manager.get(ad_id).await {
        Ok(ad) => Ok(Json(ad)),
        Err(e) => Err(ads_error(&e)),
    }
}

/// Create an advertisement authored by the caller.
///
/// # Errors
///
/// - `400 Bad Request`: Empty title or description, negative price, or no
///   pictures
/// - `404 Not Found`: Unknown category
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<NewAdvertisement>,
) -> Result<(StatusCode, Json<Advertisement>), (StatusCode, Json<ErrorResponse>)> {
    match state.ads_manager.create(&identity, payload).await {
        Ok(ad) => Ok((StatusCode::CREATED, Json(ad))),
        Err(e) => Err(ads_error(&e)),
    }
}

/// Apply a partial update; a present picture list replaces the collection.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the author nor staff
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(ad_id): Path<AdvertisementId>,
    Json(payload): Json<AdvertisementUpdate>,
) -> Result<Json<Advertisement>, (StatusCode, Json<ErrorResponse>)> {
    match state.ads_manager.update(&identity, ad_id, payload).await {
        Ok(ad) => Ok(Json(ad)),
        Err(e) => Err(ads_error(&e)),
    }
}

/// Delete an advertisement. Author or staff only.
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(ad_id): Path<AdvertisementId>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    match state.ads_manager.delete(&identity, ad_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(ads_error(&e)),
    }
}

/// Add an advertisement to the caller's favorites. Idempotent; the message
/// tells a repeat caller the advertisement was already there.
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(ad_id): Path<AdvertisementId>,
) -> Result<Json<FavoriteResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.ads_manager.add_favorite(&identity, ad_id).await {
        Ok(newly_added) => Ok(Json(FavoriteResponse {
            message: if newly_added {
                "Added to favorites".to_string()
            } else {
                "Already in favorites".to_string()
            },
        })),
        Err(e) => Err(ads_error(&e)),
    }
}

/// Remove an advertisement from the caller's favorites. Idempotent.
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(ad_id): Path<AdvertisementId>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    match state.ads_manager.remove_favorite(&identity, ad_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(ads_error(&e)),
    }
}

/// Look up the seller's contact details for an advertisement.
///
/// # Errors
///
/// - `404 Not Found`: Unknown advertisement, or the seller has no phone
///   number on file
pub async fn owner_contact(
    State(state): State<AppState>,
    Path(ad_id): Path<AdvertisementId>,
) -> Result<Json<OwnerContact>, (StatusCode, Json<ErrorResponse>)> {
    match state.ads_manager.owner_contact(ad_id).await {
        Ok(contact) => Ok(Json(contact)),
        Err(e) => Err(ads_error(&e)),
    }
}
