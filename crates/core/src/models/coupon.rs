//! Coupon-related models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Points;

/// Fallback reveal cost when a listing carries none (server default)
pub const DEFAULT_REDEEM_COST: u32 = 5;

/// Discount type enumeration used by the listing API
///
/// The UI shows display labels ("Flat Discount", ...); the wire format is
/// always the canonical uppercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiscountType {
    Flat,
    Percentage,
    Cashback,
    Bogo,
}

impl DiscountType {
    /// Canonical wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Flat => "FLAT",
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::Cashback => "CASHBACK",
            DiscountType::Bogo => "BOGO",
        }
    }

    /// Display label shown in filter dropdowns
    pub fn label(&self) -> &'static str {
        match self {
            DiscountType::Flat => "Flat Discount",
            DiscountType::Percentage => "Percentage",
            DiscountType::Cashback => "Cashback",
            DiscountType::Bogo => "BOGO",
        }
    }

    /// Translate a display label or wire value to the canonical enumeration
    ///
    /// Returns None for unknown values and for the "All Types" placeholder,
    /// which callers treat as "filter unset".
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "FLAT" | "FLAT DISCOUNT" => Some(DiscountType::Flat),
            "PERCENTAGE" => Some(DiscountType::Percentage),
            "CASHBACK" => Some(DiscountType::Cashback),
            "BOGO" => Some(DiscountType::Bogo),
            _ => None,
        }
    }
}

/// Coupon as returned by the browse listing (no secret code)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub platform: String,
    pub category: String,
    #[serde(default)]
    pub discount_type: Option<DiscountType>,
    #[serde(default)]
    pub discount_value: Option<f64>,
    #[serde(default)]
    pub min_order_value: Option<f64>,
    #[serde(default)]
    pub max_discount_value: Option<f64>,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_till: Option<NaiveDate>,
    #[serde(default)]
    pub terms_conditions: Option<String>,
    #[serde(default)]
    pub requires_unique_user: bool,
    #[serde(default)]
    pub usage_type: Option<String>,
    #[serde(default)]
    pub geo_restriction: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sold_quantity: u32,
    #[serde(default)]
    pub redeem_cost: Option<u32>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_true() -> bool {
    true
}

impl Coupon {
    /// Points required to reveal this coupon's code
    pub fn redeem_cost(&self) -> Points {
        Points(self.redeem_cost.unwrap_or(DEFAULT_REDEEM_COST))
    }

    /// Listings are presented as verified while the server reports them active
    pub fn is_verified(&self) -> bool {
        self.is_active
    }
}

/// Coupon detail from `GET /coupons/{id}`
///
/// Same shape as the listing variant plus the secret code, which the server
/// only populates for authorized callers after a paid reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponDetail {
    #[serde(flatten)]
    pub coupon: Coupon,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub total_quantity: Option<u32>,
}

impl CouponDetail {
    /// Strip the secret code (e.g. before caching)
    pub fn without_code(mut self) -> Self {
        self.code = None;
        self
    }
}

/// Request body for `POST /coupons` (listing a new coupon)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCoupon {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub code: String,
    pub platform: String,
    pub category: String,
    pub discount_type: DiscountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_till: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_conditions: Option<String>,
    pub total_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeem_cost: Option<u32>,
}

/// Response from `POST /coupons/{id}/view-code`
///
/// The server may return the code, the updated balance, both, or only a
/// confirmation message. Missing balance is resolved through the stats
/// endpoint; the client never subtracts locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealCodeResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_type_label_mapping() {
        assert_eq!(DiscountType::from_label("Flat Discount"), Some(DiscountType::Flat));
        assert_eq!(DiscountType::from_label("  Percentage "), Some(DiscountType::Percentage));
        assert_eq!(DiscountType::from_label("cashback"), Some(DiscountType::Cashback));
        assert_eq!(DiscountType::from_label("BOGO"), Some(DiscountType::Bogo));
        assert_eq!(DiscountType::from_label("All Types"), None);
    }

    #[test]
    fn test_discount_type_wire_format() {
        let json = serde_json::to_string(&DiscountType::Flat).unwrap();
        assert_eq!(json, "\"FLAT\"");
        let parsed: DiscountType = serde_json::from_str("\"PERCENTAGE\"").unwrap();
        assert_eq!(parsed, DiscountType::Percentage);
    }

    #[test]
    fn test_coupon_redeem_cost_defaults() {
        let json = r#"{
            "id": "c1",
            "title": "50% off",
            "platform": "Swiggy",
            "category": "Food"
        }"#;
        let coupon: Coupon = serde_json::from_str(json).unwrap();
        assert_eq!(coupon.redeem_cost(), Points(DEFAULT_REDEEM_COST));
        assert!(coupon.is_verified());
    }

    #[test]
    fn test_detail_without_code_drops_secret() {
        let json = r#"{
            "id": "c1",
            "title": "50% off",
            "platform": "Swiggy",
            "category": "Food",
            "code": "SAVE50"
        }"#;
        let detail: CouponDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.code.as_deref(), Some("SAVE50"));
        assert!(detail.without_code().code.is_none());
    }
}
