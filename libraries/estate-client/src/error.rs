//! Error types for the Estate client.

use estate_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to the Estate API.
///
/// The `Display` output is what ends up in the session's `last_error`, so
/// server-reported messages are shown verbatim.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed in transport
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server is offline or unreachable
    #[error("Could not reach the server: {0}")]
    ServerUnreachable(String),

    /// Server answered with `{"success": false, "message": ...}`
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Server returned a non-2xx response without a failure envelope
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// No identity in the session
    #[error("You must be signed in")]
    Unauthenticated,

    /// The session identity does not own the target
    #[error("{0}")]
    Unauthorized(String),

    /// The response arrived after a newer session change and was not applied
    #[error("Superseded by a newer session change")]
    Superseded,

    /// Rejected by local validation before any request
    #[error("{0}")]
    InvalidInput(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// File not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error reading an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Media provider did not return an image URL
    #[error("Upload failed: {0}")]
    UploadFailed(String),
}

impl ClientError {
    /// True when the request never produced a server answer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Request(_) | ClientError::ServerUnreachable(_)
        )
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        ClientError::InvalidInput(err.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
