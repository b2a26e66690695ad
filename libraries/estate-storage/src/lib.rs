//! Estate Storage
//!
//! `SQLite` persistence for users and listings.
//!
//! Each feature owns its own queries (vertical slices): [`users`] and
//! [`listings`] expose free functions over a `SqlitePool`, and [`Database`]
//! owns the pool and the embedded migrations.
//!
//! # Example
//!
//! ```rust,no_run
//! use estate_storage::{users, Database};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("sqlite://estate.db").await?;
//! let everyone = users::get_all(db.pool()).await?;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;

// Vertical slices
pub mod listings;
pub mod users;

pub use database::Database;
pub use error::{Result, StorageError};
pub use users::{StoredUser, UserChanges};
