/// Common test utilities and fixtures
use anyhow::Result;
use estate_server::{create_router, AppState, AuthService, SessionCookie};
use estate_storage::{users, Database, StoredUser};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-key";

/// Create a test database with migrations applied
pub async fn create_test_database() -> Result<Arc<Database>> {
    let db = Database::in_memory().await?;
    Ok(Arc::new(db))
}

/// Auth service with the cheapest bcrypt cost so tests stay fast
pub fn create_test_auth_service() -> Arc<AuthService> {
    Arc::new(AuthService::new(TEST_SECRET.to_string(), 1, 4))
}

/// Router over a fresh in-memory database
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AuthService>, Arc<Database>) {
    let db = create_test_database().await.unwrap();
    let auth_service = create_test_auth_service();

    let app_state = AppState::new(
        db.clone(),
        Arc::clone(&auth_service),
        SessionCookie::new(fixtures::COOKIE_NAME, false),
    )
    .with_admin_passcode(fixtures::ADMIN_PASSCODE);

    (create_router(app_state), auth_service, db)
}

/// Insert a user whose password is `password`
#[allow(dead_code)]
pub async fn create_test_user(
    db: &Database,
    auth_service: &AuthService,
    username: &str,
    email: &str,
    password: &str,
) -> StoredUser {
    let hash = auth_service.hash_password(password).unwrap();
    users::create(db.pool(), username, email, &hash, None)
        .await
        .unwrap()
}

/// Test user credentials
#[allow(dead_code)]
pub mod fixtures {
    pub const COOKIE_NAME: &str = "access_token";
    pub const ADMIN_PASSCODE: &str = "letmein-admin";

    pub const TEST_USERNAME: &str = "testuser";
    pub const TEST_EMAIL: &str = "testuser@example.com";
    pub const TEST_PASSWORD: &str = "TestPassword123!";

    pub const OTHER_USERNAME: &str = "otheruser";
    pub const OTHER_EMAIL: &str = "other@example.com";
    pub const OTHER_PASSWORD: &str = "OtherPassword456!";
}
