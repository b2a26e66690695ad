//! Listing ownership sub-flow: the signed-in user's listings as local view
//! state, plus per-item delete.
//!
//! Both operations take a `Weak` handle to the view state. If the view was
//! dropped while the request was in flight the result is discarded.

use crate::client::EstateClient;
use crate::error::Result;
use estate_core::{ListingId, ListingSummary, UserId};
use std::sync::Weak;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Listings shown under "Show Listings", in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedListings {
    pub items: Vec<ListingSummary>,
    /// Set when the last fetch failed; rendered as "Error showing listings".
    pub error: bool,
}

impl OwnedListings {
    pub fn begin_fetch(&mut self) {
        self.error = false;
    }

    /// A successful fetch replaces the sequence wholesale.
    pub fn replace(&mut self, items: Vec<ListingSummary>) {
        self.items = items;
    }

    /// A failed fetch keeps whatever was shown and raises the flag.
    pub fn mark_failed(&mut self) {
        self.error = true;
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &ListingId) -> bool {
        let before = self.items.len();
        self.items.retain(|listing| &listing.id != id);
        self.items.len() != before
    }
}

/// Fetch `owner`'s listings into `view`.
pub async fn fetch_owned_listings(
    client: &EstateClient,
    owner: &UserId,
    view: Weak<RwLock<OwnedListings>>,
) -> Result<()> {
    if let Some(state) = view.upgrade() {
        state.write().await.begin_fetch();
    }

    let outcome = client.users().get_user_listings(owner).await;
    if let Err(err) = &outcome {
        warn!(user_id = %owner, error = %err, "Could not load listings");
    }

    let Some(state) = view.upgrade() else {
        debug!(user_id = %owner, "Listings view is gone, dropping fetch result");
        return outcome.map(|_| ());
    };

    let mut state = state.write().await;
    match outcome {
        Ok(items) => {
            state.replace(items);
            Ok(())
        }
        Err(err) => {
            state.mark_failed();
            Err(err)
        }
    }
}

/// Delete one listing and drop it from `view`. The list is not re-fetched.
pub async fn delete_listing(
    client: &EstateClient,
    id: &ListingId,
    view: Weak<RwLock<OwnedListings>>,
) -> Result<()> {
    if let Err(err) = client.listings().delete_listing(id).await {
        warn!(listing_id = %id, error = %err, "Listing delete failed");
        return Err(err);
    }

    match view.upgrade() {
        Some(state) => {
            state.write().await.remove(id);
        }
        None => debug!(listing_id = %id, "Listings view is gone, nothing to update"),
    }
    Ok(())
}
