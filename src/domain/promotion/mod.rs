//! Promotions offered by a client, with their add-on ingredients.

pub mod codec;
pub mod patch;
pub mod schedule;

pub use codec::{ListCodec, PICTURE_SLOTS};
pub use patch::PromotionPatch;
pub use schedule::{filter_active, is_active_in, weekday_name};

use crate::domain::click::Clicks;
use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client's time-boxed offer.
///
/// `pictures` and `days` are lists here; they only become comma-joined text at
/// the storage boundary (see [`ListCodec`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub pictures: Vec<String>,
    pub start_at: String,
    pub end_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub clicks: Clicks,
    #[serde(default)]
    pub client_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

pub type Promotions = Vec<Promotion>;

/// Add-on line item. Owned by a promotion until attached to an order item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub promotion_id: Option<i64>,
    #[serde(default)]
    pub order_item_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub active: bool,
}

impl Promotion {
    /// Checks the fields a promotion cannot be stored without.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_pictures(&self.pictures)?;
        validate_price(self.price)?;
        validate_time_of_day("start_at", &self.start_at)?;
        validate_time_of_day("end_at", &self.end_at)?;
        Ok(())
    }

    /// Text stored in the `pictures` column.
    pub fn stored_pictures(&self) -> String {
        ListCodec::PICTURES.encode(&self.pictures)
    }

    /// Text stored in the `days` column.
    pub fn stored_days(&self) -> String {
        ListCodec::DAYS.encode(&self.days)
    }
}

pub(crate) fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(StorageError::required("title"));
    }
    Ok(())
}

pub(crate) fn validate_pictures(pictures: &[String]) -> Result<()> {
    match pictures.first() {
        Some(first) if !first.is_empty() => Ok(()),
        _ => Err(StorageError::required("pictures")),
    }
}

pub(crate) fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(StorageError::required("price"));
    }
    Ok(())
}

pub(crate) fn validate_time_of_day(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(StorageError::required(field));
    }
    Ok(())
}
