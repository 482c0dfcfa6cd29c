//! Gift model and request bodies.

use serde::{Deserialize, Serialize};

/// Purchase status of a gift.
///
/// A gift is either still available or already purchased by a guest. There
/// are no other states; `purchased_at` is set exactly when the status is
/// `Purchased`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftStatus {
    Available,
    Purchased,
}

impl GiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftStatus::Available => "available",
            GiftStatus::Purchased => "purchased",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(GiftStatus::Available),
            "purchased" => Some(GiftStatus::Purchased),
            _ => None,
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    pub id: i64,
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_link: Option<String>,
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    pub status: GiftStatus,
    /// RFC 3339 timestamp, set iff `status == Purchased`.
    pub purchased_at: Option<String>,
    /// Free text, empty unless purchased and the guest left a name.
    #[serde(default)]
    pub purchaser_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Request body for creating a new gift.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGiftRequest {
    pub store: String,
    #[serde(default)]
    pub store_link: Option<String>,
    pub item: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

/// Request body for editing gift fields.
///
/// Purchase state is not editable here; it only changes through claim and
/// reset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGiftRequest {
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub store_link: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Request body for claiming a gift.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimGiftRequest {
    #[serde(default)]
    pub purchaser_name: Option<String>,
}
