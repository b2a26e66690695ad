/// Authentication service tests
/// Tests session token generation, password hashing, token validation
mod common;

use common::{create_test_auth_service, create_test_database, fixtures, TEST_SECRET};
use estate_core::UserId;
use estate_server::services::auth::{AuthService, Claims};
use estate_storage::users;
use jsonwebtoken::{encode, EncodingKey, Header};

/// Test password hashing produces valid bcrypt hashes
#[tokio::test]
async fn test_password_hashing() {
    let auth_service = create_test_auth_service();

    let password = "MySecurePassword123!";
    let hash = auth_service.hash_password(password).unwrap();

    // Verify hash format (bcrypt starts with $2b$ or $2a$)
    assert!(hash.starts_with("$2b$") || hash.starts_with("$2a$"));
    assert_eq!(hash.len(), 60);

    // Verify the hash is different each time (salt is random)
    let hash2 = auth_service.hash_password(password).unwrap();
    assert_ne!(hash, hash2, "Hashes should differ due to random salt");
}

/// Test the configured cost ends up in the hash
#[tokio::test]
async fn test_password_hash_uses_configured_cost() {
    let auth_service = AuthService::new(TEST_SECRET.to_string(), 1, 5);
    let hash = auth_service.hash_password("pw").unwrap();
    assert!(hash.starts_with("$2b$05$"), "unexpected hash prefix: {}", hash);
}

/// Test password verification with correct and incorrect passwords
#[tokio::test]
async fn test_password_verification() {
    let auth_service = create_test_auth_service();

    let hash = auth_service.hash_password("MySecurePassword123!").unwrap();

    assert!(auth_service
        .verify_password("MySecurePassword123!", &hash)
        .unwrap());
    assert!(!auth_service.verify_password("WrongPassword", &hash).unwrap());
}

/// Test password verification with invalid hash format
#[tokio::test]
async fn test_password_verification_invalid_hash() {
    let auth_service = create_test_auth_service();

    let result = auth_service.verify_password("password", "not-a-valid-hash");
    assert!(result.is_err(), "Invalid hash should return error");
}

/// Test session token generation and validation
#[tokio::test]
async fn test_token_generation_and_validation() {
    let auth_service = create_test_auth_service();
    let user_id = UserId::new("user123");

    let token = auth_service.create_token(&user_id).unwrap();
    assert!(!token.is_empty(), "Token should not be empty");

    let decoded_user_id = auth_service.verify_token(&token).unwrap();
    assert_eq!(user_id, decoded_user_id, "Decoded user ID should match original");
}

/// Test token validation with invalid signature
#[tokio::test]
async fn test_token_validation_invalid_signature() {
    let auth_service = create_test_auth_service();

    let other_auth = AuthService::new("different-secret".to_string(), 1, 4);
    let token = other_auth.create_token(&UserId::new("user123")).unwrap();

    let result = auth_service.verify_token(&token);
    assert!(result.is_err(), "Token with wrong signature should fail validation");
}

/// Test token validation with malformed or empty tokens
#[tokio::test]
async fn test_token_validation_malformed() {
    let auth_service = create_test_auth_service();

    assert!(auth_service.verify_token("not.a.valid.jwt.token").is_err());
    assert!(auth_service.verify_token("").is_err());
}

/// Test an expired token is rejected
#[tokio::test]
async fn test_token_expiration() {
    let auth_service = create_test_auth_service();

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "user123".to_string(),
        exp: now - 3600,
        iat: now - 7200,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert!(auth_service.verify_token(&token).is_err());
}

/// Test complete authentication flow with database
#[tokio::test]
async fn test_complete_authentication_flow() {
    let db = create_test_database().await.unwrap();
    let auth_service = create_test_auth_service();

    let password_hash = auth_service.hash_password(fixtures::TEST_PASSWORD).unwrap();
    let user = users::create(
        db.pool(),
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        &password_hash,
        None,
    )
    .await
    .unwrap();

    // Simulate sign-in: look up by email, verify password, issue token
    let stored = users::get_by_email(db.pool(), fixtures::TEST_EMAIL)
        .await
        .unwrap()
        .expect("user should exist");
    assert!(auth_service
        .verify_password(fixtures::TEST_PASSWORD, &stored.password_hash)
        .unwrap());

    let token = auth_service.create_token(&stored.identity.id).unwrap();
    assert_eq!(auth_service.verify_token(&token).unwrap(), user.identity.id);
}
