/// Listing domain types
use super::ids::{ListingId, UserId};
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of images a single listing may carry
pub const MAX_LISTING_IMAGES: usize = 6;

/// Whether a property is offered for rent or for sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rent" => Some(ListingType::Rent),
            "sale" => Some(ListingType::Sale),
            _ => None,
        }
    }
}

/// Editable listing fields, as submitted on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub name: String,
    pub description: String,
    pub address: String,
    pub regular_price: u64,
    #[serde(default)]
    pub discount_price: u64,
    pub bathrooms: u32,
    pub bedrooms: u32,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    #[serde(default)]
    pub offer: bool,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl NewListing {
    /// Check the constraints both client and server enforce before a write
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_input("Listing name is required"));
        }
        if self.image_urls.is_empty() {
            return Err(CoreError::invalid_input(
                "You must upload at least one image",
            ));
        }
        if self.image_urls.len() > MAX_LISTING_IMAGES {
            return Err(CoreError::invalid_input(format!(
                "You can only upload {} images per listing",
                MAX_LISTING_IMAGES
            )));
        }
        if self.offer && self.discount_price >= self.regular_price {
            return Err(CoreError::invalid_input(
                "Discount price must be lower than regular price",
            ));
        }
        Ok(())
    }
}

/// A stored listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id", alias = "id")]
    pub id: ListingId,

    #[serde(flatten)]
    pub details: NewListing,

    /// Owner of the listing
    pub user_ref: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Project the listing down to what an owner's listing panel shows
    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            id: self.id.clone(),
            name: self.details.name.clone(),
            image_urls: self.details.image_urls.clone(),
            user_ref: Some(self.user_ref.clone()),
        }
    }
}

/// Lightweight projection of a listing owned by the current identity.
///
/// Deserializes from a full listing payload as well; extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: ListingId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub image_urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ref: Option<UserId>,
}

impl ListingSummary {
    /// The first image doubles as the cover
    pub fn cover_image_url(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}
