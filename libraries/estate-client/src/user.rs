//! User-management endpoints.

use crate::error::Result;
use crate::response::{read_ack, read_json, transport_error};
use estate_core::{Identity, ListingSummary, UpdateUserRequest, UserId};
use reqwest::Client;
use tracing::{debug, info};

/// User client for the Estate API.
pub struct UserClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> UserClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Update the signed-in user's profile.
    ///
    /// Returns the identity as stored after the update.
    pub async fn update_user(&self, id: &UserId, request: &UpdateUserRequest) -> Result<Identity> {
        let url = format!("{}/api/user/update/{}", self.base_url, id);
        debug!(
            url = %url,
            password_changed = request.new_password().is_some(),
            "Updating user"
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let identity: Identity = read_json(response, "updated user").await?;
        info!(user_id = %identity.id, "User updated");
        Ok(identity)
    }

    /// Delete the signed-in user's account.
    ///
    /// An empty or non-JSON success body counts as success.
    pub async fn delete_user(&self, id: &UserId) -> Result<()> {
        let url = format!("{}/api/user/delete/{}", self.base_url, id);
        debug!(url = %url, "Deleting user");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(transport_error)?;

        read_ack(response).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Get another user's public profile (e.g. to contact a landlord).
    pub async fn get_user(&self, id: &UserId) -> Result<Identity> {
        let url = format!("{}/api/user/{}", self.base_url, id);
        debug!(url = %url, "Fetching user");

        let response = self.http.get(&url).send().await.map_err(transport_error)?;
        read_json(response, "user").await
    }

    /// Get the listings owned by `id`, in server order.
    pub async fn get_user_listings(&self, id: &UserId) -> Result<Vec<ListingSummary>> {
        let url = format!("{}/api/user/listings/{}", self.base_url, id);
        debug!(url = %url, "Fetching owned listings");

        let response = self.http.get(&url).send().await.map_err(transport_error)?;
        let listings: Vec<ListingSummary> = read_json(response, "listings").await?;

        debug!(count = listings.len(), "Fetched owned listings");
        Ok(listings)
    }
}
