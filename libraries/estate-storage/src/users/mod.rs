//! User accounts and credentials

use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use estate_core::{Identity, UserId, DEFAULT_AVATAR_URL};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar, created_at, updated_at";

/// A user row: the public identity plus its bcrypt hash.
///
/// The hash never leaves the server; hand out [`StoredUser::into_identity`].
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub identity: Identity,
    pub password_hash: String,
}

impl StoredUser {
    /// Strip the credential hash
    pub fn into_identity(self) -> Identity {
        self.identity
    }
}

/// Partial update of a user row. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    /// Already hashed
    pub password_hash: Option<String>,
}

/// Create a user
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `username` / `email` - Must be unique, otherwise `StorageError::Duplicate`
/// * `password_hash` - Hashed password (bcrypt)
/// * `avatar` - Avatar URL, `DEFAULT_AVATAR_URL` when `None`
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
    avatar: Option<&str>,
) -> Result<StoredUser> {
    let id = UserId::generate();
    let now = Utc::now().timestamp_millis();

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, avatar, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id.as_str())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(avatar.unwrap_or(DEFAULT_AVATAR_URL))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(StorageError::from_write)?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| StorageError::Corrupt(format!("user {} vanished after insert", id)))
}

/// Get a user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<StoredUser>> {
    let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get a user by email (sign-in lookup)
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<StoredUser>> {
    let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get all users, ordered by username
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Identity>> {
    let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY username", USER_COLUMNS))
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| user_from_row(row).map(StoredUser::into_identity))
        .collect()
}

/// Apply a partial update and return the updated row, or `None` if no such user
pub async fn update(
    pool: &SqlitePool,
    id: &UserId,
    changes: &UserChanges,
) -> Result<Option<StoredUser>> {
    let result = sqlx::query(
        "UPDATE users SET
            username = COALESCE(?, username),
            email = COALESCE(?, email),
            avatar = COALESCE(?, avatar),
            password_hash = COALESCE(?, password_hash),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(changes.username.as_deref())
    .bind(changes.email.as_deref())
    .bind(changes.avatar.as_deref())
    .bind(changes.password_hash.as_deref())
    .bind(Utc::now().timestamp_millis())
    .bind(id.as_str())
    .execute(pool)
    .await
    .map_err(StorageError::from_write)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_by_id(pool, id).await
}

/// Delete a user. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: &UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn user_from_row(row: &SqliteRow) -> Result<StoredUser> {
    Ok(StoredUser {
        identity: Identity {
            id: UserId::new(row.try_get::<String, _>("id")?),
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            avatar: row.try_get("avatar")?,
            created_at: Some(timestamp(row.try_get("created_at")?)?),
            updated_at: Some(timestamp(row.try_get("updated_at")?)?),
        },
        password_hash: row.try_get("password_hash")?,
    })
}

pub(crate) fn timestamp(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StorageError::Corrupt(format!("invalid timestamp {}", millis)))
}
