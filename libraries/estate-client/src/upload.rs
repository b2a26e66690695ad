//! Image uploads to the media host.

use crate::error::{ClientError, Result};
use crate::response::transport_error;
use crate::types::{MediaConfig, UploadedImage};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Images must be strictly smaller than this.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Unsigned upload client for the media host.
pub struct MediaClient<'a> {
    http: &'a Client,
    config: &'a MediaConfig,
}

impl<'a> MediaClient<'a> {
    pub(crate) fn new(http: &'a Client, config: &'a MediaConfig) -> Self {
        Self { http, config }
    }

    /// Upload a single image file.
    ///
    /// # Arguments
    /// * `file_path` - Path to the image
    /// * `progress` - Called with a percentage (0 before sending, 100 when stored)
    ///
    /// # Returns
    /// The hosted image, whose `secure_url` is what profiles and listings store.
    pub async fn upload_image<F>(&self, file_path: &Path, mut progress: F) -> Result<UploadedImage>
    where
        F: FnMut(u8),
    {
        let mime = image_mime_type(file_path).ok_or_else(|| {
            ClientError::InvalidInput("File must be an image (jpg, png, gif, webp)".to_string())
        })?;

        let metadata = tokio::fs::metadata(file_path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ClientError::FileNotFound(file_path.display().to_string())
            } else {
                ClientError::Io(e)
            }
        })?;

        if metadata.len() >= MAX_IMAGE_BYTES {
            return Err(ClientError::InvalidInput(
                "Image size must be less than 10MB".to_string(),
            ));
        }

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        debug!(file = %file_path.display(), size = metadata.len(), "Uploading image");
        progress(0);

        let contents = tokio::fs::read(file_path).await?;
        let file_part = Part::bytes(contents)
            .file_name(file_name.clone())
            .mime_str(mime)?;

        let form = Form::new()
            .part("file", file_part)
            .text("upload_preset", self.config.upload_preset.clone());

        let response = self
            .http
            .post(self.config.upload_endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = provider_error(&body).unwrap_or_else(|| format!("status {}", status));
            warn!(status = %status, error = %message, "Image upload rejected");
            return Err(ClientError::UploadFailed(message));
        }

        let uploaded: UploadedImage = serde_json::from_str(&body)
            .map_err(|_| ClientError::UploadFailed("no image URL in response".to_string()))?;

        progress(100);
        info!(file = %file_name, url = %uploaded.secure_url, "Image uploaded");

        Ok(uploaded)
    }
}

/// `{"error": {"message": "..."}}`
fn provider_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// MIME type for an image file, `None` for anything else.
fn image_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
