/// Admin sign-in
use crate::{
    api::auth::authenticate,
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use estate_core::{AdminSignInRequest, Identity};

/// POST /api/admin/login
///
/// A regular account sign-in gated by the configured admin passcode.
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<AdminSignInRequest>,
) -> Result<(CookieJar, Json<Identity>)> {
    let Some(passcode) = app_state.admin_passcode.as_deref() else {
        return Err(ServerError::NotFound("Admin login is disabled".to_string()));
    };

    if !req.is_complete() {
        return Err(ServerError::BadRequest(
            "All fields are required for admin login".to_string(),
        ));
    }

    if req.admin_passcode != passcode {
        tracing::warn!(email = %req.email, "Wrong admin passcode");
        return Err(ServerError::Unauthorized("Invalid admin passcode".to_string()));
    }

    let user = authenticate(&app_state, &req.email, &req.password).await?;
    let token = app_state.auth_service.create_token(&user.identity.id)?;
    tracing::info!(user_id = %user.identity.id, "Admin signed in");

    Ok((
        jar.add(app_state.session_cookie.issue(token)),
        Json(user.into_identity()),
    ))
}
