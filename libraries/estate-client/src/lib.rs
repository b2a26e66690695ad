//! Estate Client
//!
//! Client side of the Estate listing app: the authenticated session and the
//! HTTP API it talks to.
//!
//! # Features
//!
//! - **Session store**: current identity, pending flag and last error, shared
//!   by every view and observable through a watch channel
//! - **Action handlers**: sign-in, sign-up, profile update, account deletion
//!   and sign-out, each ending in a session transition
//! - **Profile view model**: draft form, avatar upload, owned listings
//! - **Typed API**: auth, user, listing and media sub-clients
//!
//! # Example
//!
//! ```ignore
//! use estate_client::{ClientConfig, EstateClient, ProfileView, Route, SessionActions,
//!     SessionStore, WatchNavigator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EstateClient::new(ClientConfig::new("https://estate.example.com"))?;
//!     let (navigator, _route) = WatchNavigator::new(Route::SignIn);
//!     let actions = Arc::new(SessionActions::new(client, SessionStore::new(), navigator));
//!
//!     actions.sign_in("alice@example.com", "secret").await?;
//!
//!     let profile = ProfileView::mount(actions.clone())?;
//!     profile.show_listings().await?;
//!     println!("{:?}", profile.render().await);
//!
//!     Ok(())
//! }
//! ```

mod actions;
mod auth;
mod client;
mod error;
mod listing;
pub mod listings;
mod navigation;
mod profile;
mod response;
mod session;
mod types;
mod upload;
mod user;

// Re-export main types
pub use actions::SessionActions;
pub use client::EstateClient;
pub use error::{ClientError, Result};
pub use listings::OwnedListings;
pub use navigation::{Navigator, Route, WatchNavigator};
pub use profile::{
    AvatarUploadStatus, DraftProfile, ProfileField, ProfileRender, ProfileView,
    LISTINGS_ERROR_NOTICE, UPDATE_SUCCESS_NOTICE,
};
pub use session::{MutationTicket, SessionState, SessionStatus, SessionStore, SessionWatcher};
pub use types::{ClientConfig, MediaConfig, UploadedImage};
pub use upload::MAX_IMAGE_BYTES;

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use listing::ListingClient;
pub use upload::MediaClient;
pub use user::UserClient;
