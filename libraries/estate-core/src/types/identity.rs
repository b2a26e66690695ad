/// Identity domain type
use super::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Avatar assigned to accounts that never uploaded one.
pub const DEFAULT_AVATAR_URL: &str =
    "https://cdn.pixabay.com/photo/2015/10/05/22/37/blank-profile-picture-973460_960_720.png";

/// The authenticated user's profile record.
///
/// This type never carries a credential hash. A `password` field present in
/// a payload is ignored when deserializing, so it can neither be stored nor
/// rendered by anything holding an `Identity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Unique user identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,

    /// Display name, unique across accounts
    pub username: String,

    /// Contact email, unique across accounts
    #[serde(default)]
    pub email: String,

    /// Avatar image URL
    #[serde(default)]
    pub avatar: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Create an identity with the default avatar and no timestamps
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            avatar: DEFAULT_AVATAR_URL.to_string(),
            created_at: None,
            updated_at: None,
        }
    }
}
