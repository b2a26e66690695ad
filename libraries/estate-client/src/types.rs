//! Configuration and media types for the Estate client.

use serde::Deserialize;

/// Configuration for connecting to an Estate server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server (e.g., "https://estate.example.com")
    pub url: String,
    /// Image host for avatar and listing photos, if uploads are enabled
    pub media: Option<MediaConfig>,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            media: None,
        }
    }

    /// Enable image uploads.
    pub fn with_media(mut self, media: MediaConfig) -> Self {
        self.media = Some(media);
        self
    }
}

/// Unsigned Cloudinary upload settings.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// API origin, overridable for tests
    pub base_url: String,
    pub cloud_name: String,
    /// Name of an unsigned upload preset
    pub upload_preset: String,
}

impl MediaConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.cloudinary.com";

    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
        }
    }

    /// Point uploads at another origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/v1_1/{cloud}/image/upload`
    pub fn upload_endpoint(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

/// Response from the image host after a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
}
