//! Estate Server Library
//!
//! REST API for the Estate listing app: accounts with cookie sessions,
//! profile updates and listing management.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::AuthService;
pub use state::{AppState, SessionCookie};

/// Build the application router, everything under `/api`
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/signup", post(api::auth::signup))
        .route("/auth/signin", post(api::auth::signin))
        .route("/auth/google", post(api::auth::google))
        .route("/auth/signout", post(api::auth::signout))
        .route("/admin/login", post(api::admin::login))
        .route("/listing/get/:id", get(api::listing::get_listing));

    // Protected routes (session cookie required)
    let protected_routes = Router::new()
        // Users
        .route("/user/update/:id", post(api::user::update_user))
        .route("/user/delete/:id", delete(api::user::delete_user))
        .route("/user/listings/:id", get(api::user::get_user_listings))
        .route("/user/:id", get(api::user::get_user))
        // Listings
        .route("/listing/create", post(api::listing::create_listing))
        .route("/listing/update/:id", post(api::listing::update_listing))
        .route("/listing/delete/:id", delete(api::listing::delete_listing))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
