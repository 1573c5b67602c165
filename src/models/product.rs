//! Promotional product listed by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Platforms offered by the dashboard form, default first. The column itself
/// is free text.
pub const PLATFORMS: [&str; 5] = ["Twitter", "Newsletter", "Blog", "LinkedIn", "Other"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub url: String,
    pub tagline: String,
    pub platform: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Which side of the ownership filter a product listing selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductScope {
    /// Products owned by the current user.
    Mine,
    /// Products owned by anyone else.
    Feed,
}

/// Body of `POST /products/mine`. Every field is optional on the wire so the
/// missing-field check can answer with a single validation message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    pub url: Option<String>,
    #[validate(required, length(min = 1))]
    pub tagline: Option<String>,
    #[validate(required, length(min = 1))]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// A validated product ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub user_id: String,
    pub name: String,
    pub url: String,
    pub tagline: String,
    pub platform: String,
    pub logo_url: Option<String>,
}

/// Body of `PUT /products/{id}`. Absent fields are left untouched; an
/// explicit `null` is written as given, so it clears `logo_url` and is
/// rejected for the required columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProduct {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tagline: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub platform: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<Option<String>>,
}

impl UpdateProduct {
    /// First NOT NULL column this update would set to null, if any.
    pub fn nulled_required_column(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("url", &self.url),
            ("tagline", &self.tagline),
            ("platform", &self.platform),
        ]
        .into_iter()
        .find(|(_, value)| matches!(value, Some(None)))
        .map(|(column, _)| column)
    }

    /// Apply the present fields to an existing row. Callers reject
    /// [`nulled_required_column`](Self::nulled_required_column) first.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(Some(name)) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(Some(url)) = &self.url {
            product.url.clone_from(url);
        }
        if let Some(Some(tagline)) = &self.tagline {
            product.tagline.clone_from(tagline);
        }
        if let Some(Some(platform)) = &self.platform {
            product.platform.clone_from(platform);
        }
        if let Some(logo_url) = &self.logo_url {
            product.logo_url.clone_from(logo_url);
        }
    }
}

/// Distinguishes an explicit `null` from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
