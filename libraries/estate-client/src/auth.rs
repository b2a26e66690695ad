//! Authentication endpoints.

use crate::error::Result;
use crate::response::{read_ack, read_json, transport_error};
use estate_core::{AdminSignInRequest, GoogleSignInRequest, Identity, SignInRequest, SignUpRequest};
use reqwest::Client;
use tracing::{debug, info};

/// Authentication client for the Estate API.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Register a new account. Does not sign in.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<()> {
        let url = format!("{}/api/auth/signup", self.base_url);
        debug!(url = %url, username = %request.username, "Signing up");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        read_ack(response).await?;
        info!(username = %request.username, "Account created");
        Ok(())
    }

    /// Sign in with email and password.
    ///
    /// On success the server sets the session cookie, which the cookie store
    /// keeps for subsequent requests.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let url = format!("{}/api/auth/signin", self.base_url);
        debug!(url = %url, email = %email, "Signing in");

        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let identity: Identity = read_json(response, "sign-in response").await?;
        info!(user_id = %identity.id, username = %identity.username, "Signed in");
        Ok(identity)
    }

    /// Sign in to the admin area with credentials plus the admin passcode.
    pub async fn admin_sign_in(&self, request: &AdminSignInRequest) -> Result<Identity> {
        let url = format!("{}/api/admin/login", self.base_url);
        debug!(url = %url, email = %request.email, "Signing in as admin");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let identity: Identity = read_json(response, "admin sign-in response").await?;
        info!(user_id = %identity.id, "Signed in as admin");
        Ok(identity)
    }

    /// Exchange a Google profile (from the external identity provider) for a session.
    pub async fn google(&self, request: &GoogleSignInRequest) -> Result<Identity> {
        let url = format!("{}/api/auth/google", self.base_url);
        debug!(url = %url, email = %request.email, "Signing in with Google");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let identity: Identity = read_json(response, "sign-in response").await?;
        info!(user_id = %identity.id, "Signed in with Google");
        Ok(identity)
    }

    /// Ask the server to drop the session cookie.
    pub async fn sign_out(&self) -> Result<()> {
        let url = format!("{}/api/auth/signout", self.base_url);
        debug!(url = %url, "Signing out");

        let response = self.http.post(&url).send().await.map_err(transport_error)?;
        read_ack(response).await
    }
}
