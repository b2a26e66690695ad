/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use common::{create_test_app, create_test_user, fixtures};
use estate_storage::{listings, users};
use serde_json::{json, Value};
use tower::util::ServiceExt;

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Sign in and return the `name=value` pair of the session cookie
async fn sign_in(app: &Router, email: &str, password: &str) -> String {
    let request = json_request(
        "POST",
        "/api/auth/signin",
        None,
        &json!({ "email": email, "password": password }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("sign-in should set the session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));

    set_cookie.split(';').next().unwrap().to_string()
}

fn listing_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Two bedrooms near the park",
        "address": "1 Main St",
        "regularPrice": 1500,
        "discountPrice": 0,
        "bathrooms": 1,
        "bedrooms": 2,
        "furnished": false,
        "parking": true,
        "type": "rent",
        "offer": false,
        "imageUrls": ["https://img.example/1.png"],
    })
}

/// Test GET /api/health
#[tokio::test]
async fn test_health() {
    let (app, _, _) = create_test_app().await;

    let response = app
        .oneshot(empty_request("GET", "/api/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

/// Test sign-up then sign-in, and that no hash is ever returned
#[tokio::test]
async fn test_signup_and_signin_flow() {
    let (app, _, _) = create_test_app().await;

    let request = json_request(
        "POST",
        "/api/auth/signup",
        None,
        &json!({
            "username": fixtures::TEST_USERNAME,
            "email": fixtures::TEST_EMAIL,
            "password": fixtures::TEST_PASSWORD,
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["success"], true);

    let request = json_request(
        "POST",
        "/api/auth/signin",
        None,
        &json!({ "email": fixtures::TEST_EMAIL, "password": fixtures::TEST_PASSWORD }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], fixtures::TEST_USERNAME);
    assert!(body["_id"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

/// Test duplicate sign-up is reported with the failure envelope
#[tokio::test]
async fn test_duplicate_signup() {
    let (app, auth_service, db) = create_test_app().await;
    create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;

    let request = json_request(
        "POST",
        "/api/auth/signup",
        None,
        &json!({
            "username": fixtures::TEST_USERNAME,
            "email": fixtures::TEST_EMAIL,
            "password": "whatever",
        }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 409);
}

/// Test wrong password
#[tokio::test]
async fn test_signin_wrong_password() {
    let (app, auth_service, db) = create_test_app().await;
    create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;

    let request = json_request(
        "POST",
        "/api/auth/signin",
        None,
        &json!({ "email": fixtures::TEST_EMAIL, "password": "nope" }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Wrong credentials!");
}

/// Test admin sign-in: missing field, wrong passcode, then success with a cookie
#[tokio::test]
async fn test_admin_login() {
    let (app, auth_service, db) = create_test_app().await;
    create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;

    let request = json_request(
        "POST",
        "/api/admin/login",
        None,
        &json!({
            "email": fixtures::TEST_EMAIL,
            "password": fixtures::TEST_PASSWORD,
            "adminPasscode": "",
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "All fields are required for admin login"
    );

    let request = json_request(
        "POST",
        "/api/admin/login",
        None,
        &json!({
            "email": fixtures::TEST_EMAIL,
            "password": fixtures::TEST_PASSWORD,
            "adminPasscode": "guess",
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid admin passcode");

    let request = json_request(
        "POST",
        "/api/admin/login",
        None,
        &json!({
            "email": fixtures::TEST_EMAIL,
            "password": fixtures::TEST_PASSWORD,
            "adminPasscode": fixtures::ADMIN_PASSCODE,
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_some());
    assert_eq!(body_json(response).await["username"], fixtures::TEST_USERNAME);
}

/// Test admin sign-in is refused when no passcode is configured
#[tokio::test]
async fn test_admin_login_disabled_without_passcode() {
    let db = common::create_test_database().await.unwrap();
    let auth_service = common::create_test_auth_service();
    let app = estate_server::create_router(estate_server::AppState::new(
        db,
        auth_service,
        estate_server::SessionCookie::new(fixtures::COOKIE_NAME, false),
    ));

    let request = json_request(
        "POST",
        "/api/admin/login",
        None,
        &json!({ "email": "a@x.com", "password": "pw", "adminPasscode": "anything" }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Admin login is disabled");
}

/// Test Google sign-in creates the account once and reuses it
#[tokio::test]
async fn test_google_signin_creates_then_reuses_account() {
    let (app, _, db) = create_test_app().await;
    let profile = json!({
        "name": "Jane Doe",
        "email": "jane@gmail.com",
        "photo": "https://lh3.googleusercontent.com/jane.png",
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/google", None, &profile))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_some());
    let first = body_json(response).await;
    assert!(first["username"].as_str().unwrap().starts_with("janedoe"));
    assert_eq!(first["avatar"], "https://lh3.googleusercontent.com/jane.png");

    let response = app
        .oneshot(json_request("POST", "/api/auth/google", None, &profile))
        .await
        .unwrap();
    let second = body_json(response).await;
    assert_eq!(first["_id"], second["_id"]);

    assert_eq!(users::get_all(db.pool()).await.unwrap().len(), 1);
}

/// Test protected route without a session cookie
#[tokio::test]
async fn test_update_without_cookie_unauthorized() {
    let (app, _, _) = create_test_app().await;

    let request = json_request(
        "POST",
        "/api/user/update/u1",
        None,
        &json!({ "username": "x" }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["success"], false);
}

/// Test a forged cookie is rejected
#[tokio::test]
async fn test_invalid_cookie_rejected() {
    let (app, _, _) = create_test_app().await;

    let response = app
        .oneshot(empty_request(
            "GET",
            "/api/user/listings/u1",
            Some("access_token=not-a-jwt"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Test update changes only the given fields and keeps the password on blank
#[tokio::test]
async fn test_update_partial_with_blank_password() {
    let (app, auth_service, db) = create_test_app().await;
    let user = create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;
    let cookie = sign_in(&app, fixtures::TEST_EMAIL, fixtures::TEST_PASSWORD).await;

    let uri = format!("/api/user/update/{}", user.identity.id);
    let request = json_request(
        "POST",
        &uri,
        Some(&cookie),
        &json!({ "username": "renamed", "password": "" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "renamed");
    assert_eq!(body["email"], fixtures::TEST_EMAIL);
    assert!(body.get("password").is_none());

    // The old password still works
    sign_in(&app, fixtures::TEST_EMAIL, fixtures::TEST_PASSWORD).await;
}

/// Test update with a new password replaces the credential
#[tokio::test]
async fn test_update_password() {
    let (app, auth_service, db) = create_test_app().await;
    let user = create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;
    let cookie = sign_in(&app, fixtures::TEST_EMAIL, fixtures::TEST_PASSWORD).await;

    let uri = format!("/api/user/update/{}", user.identity.id);
    let request = json_request("POST", &uri, Some(&cookie), &json!({ "password": "n3w-pass" }));
    assert_eq!(
        app.clone().oneshot(request).await.unwrap().status(),
        StatusCode::OK
    );

    let stored = users::get_by_id(db.pool(), &user.identity.id)
        .await
        .unwrap()
        .unwrap();
    assert!(auth_service
        .verify_password("n3w-pass", &stored.password_hash)
        .unwrap());
    assert!(!auth_service
        .verify_password(fixtures::TEST_PASSWORD, &stored.password_hash)
        .unwrap());
}

/// Test a user cannot update or delete someone else
#[tokio::test]
async fn test_cannot_touch_other_account() {
    let (app, auth_service, db) = create_test_app().await;
    create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;
    let other = create_test_user(
        &db,
        &auth_service,
        fixtures::OTHER_USERNAME,
        fixtures::OTHER_EMAIL,
        fixtures::OTHER_PASSWORD,
    )
    .await;
    let cookie = sign_in(&app, fixtures::TEST_EMAIL, fixtures::TEST_PASSWORD).await;

    let uri = format!("/api/user/update/{}", other.identity.id);
    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(&cookie), &json!({ "username": "hijack" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "You can only update your own account!");
    assert_eq!(body["statusCode"], 401);

    let uri = format!("/api/user/delete/{}", other.identity.id);
    let response = app
        .oneshot(empty_request("DELETE", &uri, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "You can only delete your own account!"
    );

    assert!(users::get_by_id(db.pool(), &other.identity.id)
        .await
        .unwrap()
        .is_some());
}

/// Test delete removes the account and clears the cookie
#[tokio::test]
async fn test_delete_account() {
    let (app, auth_service, db) = create_test_app().await;
    let user = create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;
    let cookie = sign_in(&app, fixtures::TEST_EMAIL, fixtures::TEST_PASSWORD).await;

    let uri = format!("/api/user/delete/{}", user.identity.id);
    let response = app
        .oneshot(empty_request("DELETE", &uri, Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cleared.starts_with("access_token="));
    assert!(cleared.contains("Max-Age=0") || cleared.contains("Expires="));

    let body = body_json(response).await;
    assert_eq!(body, json!({ "success": true, "message": "User has been deleted!" }));
    assert!(users::get_by_id(db.pool(), &user.identity.id)
        .await
        .unwrap()
        .is_none());
}

/// Test sign-out clears the cookie
#[tokio::test]
async fn test_signout() {
    let (app, auth_service, db) = create_test_app().await;
    create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;
    let cookie = sign_in(&app, fixtures::TEST_EMAIL, fixtures::TEST_PASSWORD).await;

    let response = app
        .oneshot(empty_request("POST", "/api/auth/signout", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cleared.starts_with("access_token=;"));
}

/// Test the listing lifecycle and ownership rules
#[tokio::test]
async fn test_listing_lifecycle() {
    let (app, auth_service, db) = create_test_app().await;
    let user = create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;
    create_test_user(
        &db,
        &auth_service,
        fixtures::OTHER_USERNAME,
        fixtures::OTHER_EMAIL,
        fixtures::OTHER_PASSWORD,
    )
    .await;
    let cookie = sign_in(&app, fixtures::TEST_EMAIL, fixtures::TEST_PASSWORD).await;
    let other_cookie = sign_in(&app, fixtures::OTHER_EMAIL, fixtures::OTHER_PASSWORD).await;

    // Create
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/listing/create",
            Some(&cookie),
            &listing_body("Cozy flat"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["_id"].as_str().unwrap().to_string();
    assert_eq!(created["userRef"], user.identity.id.as_str());

    // Listed for the owner
    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            &format!("/api/user/listings/{}", user.identity.id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let owned = body_json(response).await;
    assert_eq!(owned.as_array().unwrap().len(), 1);

    // Public get
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/listing/get/{id}"), None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["name"], "Cozy flat");

    // Someone else cannot update or delete it
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/listing/update/{id}"),
            Some(&other_cookie),
            &listing_body("Stolen"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/listing/delete/{id}"),
            Some(&other_cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Owner updates then deletes
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/listing/update/{id}"),
            Some(&cookie),
            &listing_body("Cozier flat"),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["name"], "Cozier flat");

    let response = app
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/listing/delete/{id}"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(listings::get_by_owner(db.pool(), &user.identity.id)
        .await
        .unwrap()
        .is_empty());
}

/// Test invalid listings are rejected before storage
#[tokio::test]
async fn test_create_listing_validation() {
    let (app, auth_service, db) = create_test_app().await;
    create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;
    let cookie = sign_in(&app, fixtures::TEST_EMAIL, fixtures::TEST_PASSWORD).await;

    let mut body = listing_body("No pictures");
    body["imageUrls"] = json!([]);

    let response = app
        .oneshot(json_request("POST", "/api/listing/create", Some(&cookie), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "You must upload at least one image"
    );
}

/// Test listing of someone else's listings is refused
#[tokio::test]
async fn test_listings_of_other_user_refused() {
    let (app, auth_service, db) = create_test_app().await;
    create_test_user(
        &db,
        &auth_service,
        fixtures::TEST_USERNAME,
        fixtures::TEST_EMAIL,
        fixtures::TEST_PASSWORD,
    )
    .await;
    let other = create_test_user(
        &db,
        &auth_service,
        fixtures::OTHER_USERNAME,
        fixtures::OTHER_EMAIL,
        fixtures::OTHER_PASSWORD,
    )
    .await;
    let cookie = sign_in(&app, fixtures::TEST_EMAIL, fixtures::TEST_PASSWORD).await;

    let response = app
        .oneshot(empty_request(
            "GET",
            &format!("/api/user/listings/{}", other.identity.id),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
