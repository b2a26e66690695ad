//! Listing endpoints.

use crate::error::Result;
use crate::response::{read_ack, read_json, transport_error};
use estate_core::{Listing, ListingId, NewListing};
use reqwest::Client;
use tracing::{debug, info};

/// Listing client for the Estate API.
pub struct ListingClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> ListingClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Create a listing owned by the signed-in user.
    pub async fn create_listing(&self, listing: &NewListing) -> Result<Listing> {
        listing.validate()?;

        let url = format!("{}/api/listing/create", self.base_url);
        debug!(url = %url, name = %listing.name, "Creating listing");

        let response = self
            .http
            .post(&url)
            .json(listing)
            .send()
            .await
            .map_err(transport_error)?;

        let created: Listing = read_json(response, "listing").await?;
        info!(listing_id = %created.id, "Listing created");
        Ok(created)
    }

    /// Replace the editable fields of a listing the signed-in user owns.
    pub async fn update_listing(&self, id: &ListingId, listing: &NewListing) -> Result<Listing> {
        listing.validate()?;

        let url = format!("{}/api/listing/update/{}", self.base_url, id);
        debug!(url = %url, "Updating listing");

        let response = self
            .http
            .post(&url)
            .json(listing)
            .send()
            .await
            .map_err(transport_error)?;

        let updated: Listing = read_json(response, "listing").await?;
        info!(listing_id = %updated.id, "Listing updated");
        Ok(updated)
    }

    /// Get a single listing.
    pub async fn get_listing(&self, id: &ListingId) -> Result<Listing> {
        let url = format!("{}/api/listing/get/{}", self.base_url, id);
        debug!(url = %url, "Fetching listing");

        let response = self.http.get(&url).send().await.map_err(transport_error)?;
        read_json(response, "listing").await
    }

    /// Delete a listing the signed-in user owns.
    pub async fn delete_listing(&self, id: &ListingId) -> Result<()> {
        let url = format!("{}/api/listing/delete/{}", self.base_url, id);
        debug!(url = %url, "Deleting listing");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(transport_error)?;

        read_ack(response).await?;
        info!(listing_id = %id, "Listing deleted");
        Ok(())
    }
}
