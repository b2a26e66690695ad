/// API route modules
pub mod admin;
pub mod auth;
pub mod health;
pub mod listing;
pub mod user;
