/// Listing API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use estate_core::{ApiMessage, Listing, ListingId, NewListing};
use estate_storage::listings;

/// POST /api/listing/create
pub async fn create_listing(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<NewListing>,
) -> Result<(StatusCode, Json<Listing>)> {
    req.validate()?;

    let listing = listings::create(app_state.db.pool(), user.user_id(), &req).await?;

    tracing::info!(listing_id = %listing.id, user_id = %user.user_id(), "Listing created");
    Ok((StatusCode::CREATED, Json(listing)))
}

/// POST /api/listing/update/:id
pub async fn update_listing(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<ListingId>,
    Json(req): Json<NewListing>,
) -> Result<Json<Listing>> {
    let existing = find_listing(&app_state, &id).await?;
    if &existing.user_ref != user.user_id() {
        return Err(ServerError::Unauthorized(
            "You can only update your own listings!".to_string(),
        ));
    }

    req.validate()?;

    let listing = listings::update(app_state.db.pool(), &id, &req)
        .await?
        .ok_or_else(|| ServerError::NotFound("Listing not found!".to_string()))?;

    tracing::info!(listing_id = %id, "Listing updated");
    Ok(Json(listing))
}

/// GET /api/listing/get/:id
pub async fn get_listing(
    State(app_state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Result<Json<Listing>> {
    find_listing(&app_state, &id).await.map(Json)
}

/// DELETE /api/listing/delete/:id
pub async fn delete_listing(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<ListingId>,
) -> Result<Json<ApiMessage>> {
    let existing = find_listing(&app_state, &id).await?;
    if &existing.user_ref != user.user_id() {
        return Err(ServerError::Unauthorized(
            "You can only delete your own listings!".to_string(),
        ));
    }

    listings::delete(app_state.db.pool(), &id).await?;

    tracing::info!(listing_id = %id, "Listing deleted");
    Ok(Json(ApiMessage::ok("Listing has been deleted!")))
}

async fn find_listing(app_state: &AppState, id: &ListingId) -> Result<Listing> {
    listings::get(app_state.db.pool(), id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Listing not found!".to_string()))
}
