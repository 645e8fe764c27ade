//! Coupon listing operations with validation

use crate::DealVistaClient;
use dealvista_core::{CouponDetail, Error, NewCoupon, Result};
use tracing::info;

/// Validate a listing before it goes on the wire
///
/// Catches the same mistakes the original upload form blocked, so a bad
/// request never reaches the server.
pub fn validate_new_coupon(coupon: &NewCoupon) -> Result<()> {
    if coupon.title.trim().is_empty() {
        return Err(Error::ValidationError("Title must not be empty".to_string()));
    }
    if coupon.code.trim().is_empty() {
        return Err(Error::ValidationError("Coupon code must not be empty".to_string()));
    }
    if coupon.platform.trim().is_empty() {
        return Err(Error::ValidationError("Platform must not be empty".to_string()));
    }
    if coupon.category.trim().is_empty() {
        return Err(Error::ValidationError("Category must not be empty".to_string()));
    }
    if coupon.total_quantity == 0 {
        return Err(Error::ValidationError(
            "Quantity must be at least 1".to_string(),
        ));
    }
    if let (Some(from), Some(till)) = (coupon.valid_from, coupon.valid_till) {
        if till < from {
            return Err(Error::ValidationError(
                "Validity window ends before it starts".to_string(),
            ));
        }
    }
    Ok(())
}

/// List a new coupon
pub async fn create_coupon(client: &DealVistaClient, coupon: &NewCoupon) -> Result<CouponDetail> {
    validate_new_coupon(coupon)?;

    info!("Listing coupon '{}' on {}", coupon.title, coupon.platform);
    client.create_coupon(coupon).await
}
