//! Typed partial update of a promotion.

use super::{
    validate_pictures, validate_price, validate_time_of_day, validate_title, Ingredient, ListCodec,
    Promotion,
};
use crate::error::Result;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Fields of a promotion that may be replaced by an update. `None` leaves the
/// stored value untouched.
///
/// A `pictures` value that is not a list of strings deserializes to `None`, so
/// a malformed picture list is dropped from the update instead of failing it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PromotionPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub pictures: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<String>,
    #[serde(default)]
    pub days: Option<Vec<String>>,
    /// Replaces every ingredient the promotion currently owns.
    #[serde(default)]
    pub ingredients: Option<Vec<Ingredient>>,
}

/// Value bound for one column of the `promotions` UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    Float(f64),
}

impl PromotionPatch {
    pub fn is_empty(&self) -> bool {
        *self == PromotionPatch::default()
    }

    /// Rejects present fields that would break a stored promotion.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(pictures) = &self.pictures {
            validate_pictures(pictures)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(start_at) = &self.start_at {
            validate_time_of_day("start_at", start_at)?;
        }
        if let Some(end_at) = &self.end_at {
            validate_time_of_day("end_at", end_at)?;
        }
        Ok(())
    }

    /// Column assignments for the `promotions` row, lists already encoded.
    pub fn changes(&self) -> Vec<(&'static str, ColumnValue)> {
        let mut changes = Vec::new();
        if let Some(title) = &self.title {
            changes.push(("title", ColumnValue::Text(title.clone())));
        }
        if let Some(pictures) = &self.pictures {
            changes.push(("pictures", ColumnValue::Text(ListCodec::PICTURES.encode(pictures))));
        }
        if let Some(description) = &self.description {
            changes.push(("description", ColumnValue::Text(description.clone())));
        }
        if let Some(price) = self.price {
            changes.push(("price", ColumnValue::Float(price)));
        }
        if let Some(start_at) = &self.start_at {
            changes.push(("start_at", ColumnValue::Text(start_at.clone())));
        }
        if let Some(end_at) = &self.end_at {
            changes.push(("end_at", ColumnValue::Text(end_at.clone())));
        }
        if let Some(days) = &self.days {
            changes.push(("days", ColumnValue::Text(ListCodec::DAYS.encode(days))));
        }
        changes
    }
}

/// Full replacement with the fields of `promotion`.
impl From<Promotion> for PromotionPatch {
    fn from(p: Promotion) -> Self {
        Self {
            title: Some(p.title),
            pictures: Some(p.pictures),
            description: p.description,
            price: Some(p.price),
            start_at: Some(p.start_at),
            end_at: Some(p.end_at),
            days: Some(p.days),
            ingredients: Some(p.ingredients),
        }
    }
}

fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value::<Vec<String>>(v).ok()))
}
