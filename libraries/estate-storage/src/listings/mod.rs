//! Property listings

use crate::error::{Result, StorageError};
use crate::users::timestamp;
use chrono::Utc;
use estate_core::{Listing, ListingId, ListingType, NewListing, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const LISTING_COLUMNS: &str = "id, name, description, address, regular_price, discount_price, \
     bathrooms, bedrooms, furnished, parking, listing_type, offer, image_urls, user_ref, \
     created_at, updated_at";

/// Create a listing owned by `owner`
pub async fn create(pool: &SqlitePool, owner: &UserId, listing: &NewListing) -> Result<Listing> {
    let id = ListingId::generate();
    let now = Utc::now().timestamp_millis();
    let image_urls = serde_json::to_string(&listing.image_urls)
        .map_err(|e| StorageError::Corrupt(e.to_string()))?;

    sqlx::query(
        "INSERT INTO listings (id, name, description, address, regular_price, discount_price,
            bathrooms, bedrooms, furnished, parking, listing_type, offer, image_urls, user_ref,
            created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id.as_str())
    .bind(&listing.name)
    .bind(&listing.description)
    .bind(&listing.address)
    .bind(listing.regular_price as i64)
    .bind(listing.discount_price as i64)
    .bind(i64::from(listing.bathrooms))
    .bind(i64::from(listing.bedrooms))
    .bind(listing.furnished)
    .bind(listing.parking)
    .bind(listing.listing_type.as_str())
    .bind(listing.offer)
    .bind(image_urls)
    .bind(owner.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(StorageError::from_write)?;

    get(pool, &id)
        .await?
        .ok_or_else(|| StorageError::Corrupt(format!("listing {} vanished after insert", id)))
}

/// Get a listing by ID
pub async fn get(pool: &SqlitePool, id: &ListingId) -> Result<Option<Listing>> {
    let row = sqlx::query(&format!("SELECT {} FROM listings WHERE id = ?", LISTING_COLUMNS))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(listing_from_row).transpose()
}

/// All listings owned by `owner`, oldest first
pub async fn get_by_owner(pool: &SqlitePool, owner: &UserId) -> Result<Vec<Listing>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM listings WHERE user_ref = ? ORDER BY created_at, rowid",
        LISTING_COLUMNS
    ))
    .bind(owner.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(listing_from_row).collect()
}

/// Replace the editable fields of a listing. Returns `None` if it does not exist.
pub async fn update(
    pool: &SqlitePool,
    id: &ListingId,
    listing: &NewListing,
) -> Result<Option<Listing>> {
    let image_urls = serde_json::to_string(&listing.image_urls)
        .map_err(|e| StorageError::Corrupt(e.to_string()))?;

    let result = sqlx::query(
        "UPDATE listings SET
            name = ?, description = ?, address = ?, regular_price = ?, discount_price = ?,
            bathrooms = ?, bedrooms = ?, furnished = ?, parking = ?, listing_type = ?,
            offer = ?, image_urls = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&listing.name)
    .bind(&listing.description)
    .bind(&listing.address)
    .bind(listing.regular_price as i64)
    .bind(listing.discount_price as i64)
    .bind(i64::from(listing.bathrooms))
    .bind(i64::from(listing.bedrooms))
    .bind(listing.furnished)
    .bind(listing.parking)
    .bind(listing.listing_type.as_str())
    .bind(listing.offer)
    .bind(image_urls)
    .bind(Utc::now().timestamp_millis())
    .bind(id.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

/// Delete a listing. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: &ListingId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM listings WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn listing_from_row(row: &SqliteRow) -> Result<Listing> {
    let listing_type: String = row.try_get("listing_type")?;
    let listing_type = ListingType::parse(&listing_type)
        .ok_or_else(|| StorageError::Corrupt(format!("unknown listing type {}", listing_type)))?;

    let image_urls: String = row.try_get("image_urls")?;
    let image_urls: Vec<String> =
        serde_json::from_str(&image_urls).map_err(|e| StorageError::Corrupt(e.to_string()))?;

    Ok(Listing {
        id: ListingId::new(row.try_get::<String, _>("id")?),
        details: NewListing {
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            address: row.try_get("address")?,
            regular_price: row.try_get::<i64, _>("regular_price")? as u64,
            discount_price: row.try_get::<i64, _>("discount_price")? as u64,
            bathrooms: row.try_get::<i64, _>("bathrooms")? as u32,
            bedrooms: row.try_get::<i64, _>("bedrooms")? as u32,
            furnished: row.try_get("furnished")?,
            parking: row.try_get("parking")?,
            listing_type,
            offer: row.try_get("offer")?,
            image_urls,
        },
        user_ref: UserId::new(row.try_get::<String, _>("user_ref")?),
        created_at: Some(timestamp(row.try_get("created_at")?)?),
        updated_at: Some(timestamp(row.try_get("updated_at")?)?),
    })
}
