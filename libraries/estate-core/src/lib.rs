//! Estate Core
//!
//! Shared domain types and error handling for the Estate client and server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Identity`, `Listing`, `ListingSummary`
//! - **Wire Types**: request/response bodies shared by client and server
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use estate_core::{Identity, UserId};
//!
//! let identity: Identity = serde_json::from_str(
//!     r#"{"_id":"u1","username":"alice","email":"a@x.com","password":"$2b$10$secret"}"#,
//! ).unwrap();
//!
//! assert_eq!(identity.id, UserId::new("u1"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

pub use error::{CoreError, Result};

pub use types::{
    // Identity
    Identity, UserId, DEFAULT_AVATAR_URL,
    // Listings
    Listing, ListingId, ListingSummary, ListingType, NewListing, MAX_LISTING_IMAGES,
    // Wire types
    AdminSignInRequest, ApiFailure, ApiMessage, GoogleSignInRequest, SignInRequest, SignUpRequest,
    UpdateUserRequest,
};
