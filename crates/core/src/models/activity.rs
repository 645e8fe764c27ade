//! Activity history models: logs and per-user coupon lists

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry from `GET /logs`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Coupon the user listed, from `GET /users/me/coupons-added`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedCoupon {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub code: Option<String>,
    pub platform: String,
    pub category: String,
    #[serde(default)]
    pub valid_till: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub sold_quantity: u32,
    #[serde(default)]
    pub total_quantity: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Coupon the user paid to reveal, from `GET /users/me/coupons-redeemed`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemedCoupon {
    pub redemption_id: String,
    pub coupon_id: String,
    pub title: String,
    #[serde(default)]
    pub code: Option<String>,
    pub platform: String,
    pub category: String,
    #[serde(default)]
    pub points_deducted: u32,
    #[serde(default)]
    pub redeemed_at: Option<DateTime<Utc>>,
}
