//! Main Estate API client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::listing::ListingClient;
use crate::types::{ClientConfig, MediaConfig};
use crate::upload::MediaClient;
use crate::user::UserClient;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the Estate REST API.
///
/// Authorization is an HTTP-only session cookie: the server sets it at
/// sign-in and the client's cookie store replays it on every later request.
/// Nothing ever attaches a bearer token by hand.
///
/// Cloning is cheap and clones share the cookie store.
///
/// # Example
///
/// ```ignore
/// use estate_client::{ClientConfig, EstateClient};
///
/// let client = EstateClient::new(ClientConfig::new("https://estate.example.com"))?;
/// let identity = client.auth().sign_in("a@x.com", "secret").await?;
/// let listings = client.users().get_user_listings(&identity.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct EstateClient {
    http: Client,
    base_url: Arc<str>,
    media: Option<Arc<MediaConfig>>,
}

impl EstateClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Estate/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            base_url: url.into(),
            media: config.media.map(Arc::new),
        })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Sign-up, sign-in and sign-out.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.http, &self.base_url)
    }

    /// Profile updates, account deletion and owned listings.
    pub fn users(&self) -> UserClient<'_> {
        UserClient::new(&self.http, &self.base_url)
    }

    /// Listing CRUD.
    pub fn listings(&self) -> ListingClient<'_> {
        ListingClient::new(&self.http, &self.base_url)
    }

    /// Image uploads. Fails if no media host was configured.
    pub fn media(&self) -> Result<MediaClient<'_>> {
        let config = self
            .media
            .as_deref()
            .ok_or_else(|| ClientError::InvalidInput("Image uploads are not configured".into()))?;
        Ok(MediaClient::new(&self.http, config))
    }
}
