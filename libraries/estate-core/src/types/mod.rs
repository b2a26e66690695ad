/// Domain types for Estate
pub mod api;
pub mod identity;
pub mod ids;
pub mod listing;

pub use api::{
    AdminSignInRequest, ApiFailure, ApiMessage, GoogleSignInRequest, SignInRequest, SignUpRequest,
    UpdateUserRequest,
};
pub use identity::{Identity, DEFAULT_AVATAR_URL};
pub use ids::{ListingId, UserId};
pub use listing::{Listing, ListingSummary, ListingType, NewListing, MAX_LISTING_IMAGES};
