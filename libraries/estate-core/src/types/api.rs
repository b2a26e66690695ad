/// Request and response bodies shared by the client and the server
use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/signup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/signin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/admin/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSignInRequest {
    pub email: String,
    pub password: String,
    pub admin_passcode: String,
}

impl AdminSignInRequest {
    /// All three fields present
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty()
            && !self.password.is_empty()
            && !self.admin_passcode.is_empty()
    }
}

/// Body of `POST /api/auth/google`, built from a Google profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSignInRequest {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

/// Body of `POST /api/user/update/{id}`.
///
/// Absent fields leave the stored value unchanged. A blank password is
/// treated as absent on both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// The password to hash and store, if one was actually supplied
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Plain acknowledgement, e.g. `{"success":true,"message":"User has been deleted!"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

fn default_success() -> bool {
    true
}

/// Failure envelope every API error is reported with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub success: bool,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
}

impl ApiFailure {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            message: message.into(),
        }
    }
}
