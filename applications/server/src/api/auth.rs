/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use estate_core::{ApiMessage, GoogleSignInRequest, Identity, SignInRequest, SignUpRequest};
use estate_storage::{users, StoredUser};

/// POST /api/auth/signup
pub async fn signup(
    State(app_state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<ApiMessage>)> {
    let username = req.username.trim();
    let email = req.email.trim();
    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ServerError::BadRequest("All fields are required".to_string()));
    }

    let password_hash = app_state.auth_service.hash_password(&req.password)?;
    let user = users::create(app_state.db.pool(), username, email, &password_hash, None).await?;

    tracing::info!(user_id = %user.identity.id, username = %username, "User signed up");
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::ok("User created successfully!")),
    ))
}

/// POST /api/auth/signin
///
/// Sets the session cookie and returns the identity without its hash.
pub async fn signin(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignInRequest>,
) -> Result<(CookieJar, Json<Identity>)> {
    let user = authenticate(&app_state, &req.email, &req.password).await?;

    let token = app_state.auth_service.create_token(&user.identity.id)?;
    tracing::info!(user_id = %user.identity.id, "User signed in");

    Ok((
        jar.add(app_state.session_cookie.issue(token)),
        Json(user.into_identity()),
    ))
}

/// POST /api/auth/google
///
/// Signs in the account registered under the Google email, creating it on
/// first use with a random password and the Google photo as avatar.
pub async fn google(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<GoogleSignInRequest>,
) -> Result<(CookieJar, Json<Identity>)> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(ServerError::BadRequest("Email is required".to_string()));
    }

    let pool = app_state.db.pool();
    let user = if let Some(user) = users::get_by_email(pool, email).await? {
        user
    } else {
        let password = uuid::Uuid::new_v4().simple().to_string();
        let password_hash = app_state.auth_service.hash_password(&password)?;
        let username = google_username(&req.name);

        let user = users::create(pool, &username, email, &password_hash, req.photo.as_deref())
            .await?;
        tracing::info!(user_id = %user.identity.id, username = %username, "Created account from Google profile");
        user
    };

    let token = app_state.auth_service.create_token(&user.identity.id)?;

    Ok((
        jar.add(app_state.session_cookie.issue(token)),
        Json(user.into_identity()),
    ))
}

/// POST /api/auth/signout
pub async fn signout(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiMessage>) {
    (
        jar.remove(app_state.session_cookie.removal()),
        Json(ApiMessage::ok("User has been logged out!")),
    )
}

/// Look up the account by email and check its password
pub(crate) async fn authenticate(
    app_state: &AppState,
    email: &str,
    password: &str,
) -> Result<StoredUser> {
    let user = users::get_by_email(app_state.db.pool(), email.trim())
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found!".to_string()))?;

    if !app_state
        .auth_service
        .verify_password(password, &user.password_hash)?
    {
        tracing::warn!(user_id = %user.identity.id, "Wrong password");
        return Err(ServerError::Unauthorized("Wrong credentials!".to_string()));
    }

    Ok(user)
}

/// Lowercased display name without spaces, plus a random suffix
fn google_username(name: &str) -> String {
    let base: String = name
        .split_whitespace()
        .collect::<String>()
        .to_lowercase();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", base, &suffix[..4])
}
