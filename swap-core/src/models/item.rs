use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SwapError;

/// A marketplace listing as stored in the `items` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub condition: String,
    pub seller_id: String,
    pub seller_name: String,
    #[sqlx(json)]
    #[serde(default)]
    pub images: Vec<String>,
    #[sqlx(json)]
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub distance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing fields supplied by the caller; timestamps are assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub condition: String,
    pub seller_id: String,
    pub seller_name: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub distance: f64,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), SwapError> {
        let required = [
            ("id", &self.id),
            ("title", &self.title),
            ("description", &self.description),
            ("category", &self.category),
            ("condition", &self.condition),
            ("seller_id", &self.seller_id),
            ("seller_name", &self.seller_name),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(SwapError::Validation(format!("{} must not be empty", field)));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(SwapError::Validation(format!(
                "price must be a non-negative number, got {}",
                self.price
            )));
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(SwapError::Validation(format!(
                "distance must be a non-negative number, got {}",
                self.distance
            )));
        }
        Ok(())
    }

    pub fn into_item(self, now: DateTime<Utc>) -> Item {
        Item {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            category: self.category,
            condition: self.condition,
            seller_id: self.seller_id,
            seller_name: self.seller_name,
            images: self.images,
            tags: self.tags,
            distance: self.distance,
            created_at: now,
            updated_at: now,
        }
    }
}
