/// User API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use estate_core::{ApiMessage, Identity, Listing, UpdateUserRequest, UserId};
use estate_storage::{listings, users, UserChanges};

/// POST /api/user/update/:id
///
/// Only the fields present are changed. A blank password keeps the stored
/// hash.
pub async fn update_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<UserId>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Identity>> {
    if user.user_id() != &id {
        return Err(ServerError::Unauthorized(
            "You can only update your own account!".to_string(),
        ));
    }

    let password_hash = req
        .new_password()
        .map(|password| app_state.auth_service.hash_password(password))
        .transpose()?;

    let changes = UserChanges {
        username: non_blank(req.username),
        email: non_blank(req.email),
        avatar: non_blank(req.avatar),
        password_hash,
    };

    let updated = users::update(app_state.db.pool(), &id, &changes)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    tracing::info!(
        user_id = %id,
        password_changed = changes.password_hash.is_some(),
        "User updated"
    );
    Ok(Json(updated.into_identity()))
}

/// DELETE /api/user/delete/:id
pub async fn delete_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    jar: CookieJar,
    Path(id): Path<UserId>,
) -> Result<(CookieJar, Json<ApiMessage>)> {
    if user.user_id() != &id {
        return Err(ServerError::Unauthorized(
            "You can only delete your own account!".to_string(),
        ));
    }

    if !users::delete(app_state.db.pool(), &id).await? {
        return Err(ServerError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %id, "User deleted");
    Ok((
        jar.remove(app_state.session_cookie.removal()),
        Json(ApiMessage::ok("User has been deleted!")),
    ))
}

/// GET /api/user/:id
pub async fn get_user(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<UserId>,
) -> Result<Json<Identity>> {
    let user = users::get_by_id(app_state.db.pool(), &id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found!".to_string()))?;

    Ok(Json(user.into_identity()))
}

/// GET /api/user/listings/:id
pub async fn get_user_listings(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<Listing>>> {
    if user.user_id() != &id {
        return Err(ServerError::Unauthorized(
            "You can only view your own listings!".to_string(),
        ));
    }

    let listings = listings::get_by_owner(app_state.db.pool(), &id).await?;
    Ok(Json(listings))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
