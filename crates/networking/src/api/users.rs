//! User-related API operations

use crate::DealVistaClient;
use dealvista_core::{ListedCoupon, LogEntry, RedeemedCoupon, Result, UserProfile, UserStats};

/// Fetch the current user's profile
pub async fn fetch_profile(client: &DealVistaClient) -> Result<UserProfile> {
    client.get_profile().await
}

/// Fetch aggregate stats (the authoritative points balance source)
pub async fn fetch_stats(client: &DealVistaClient) -> Result<UserStats> {
    client.get_stats().await
}

/// Coupons the user has listed
pub async fn fetch_coupons_added(client: &DealVistaClient) -> Result<Vec<ListedCoupon>> {
    client.get_coupons_added().await
}

/// Coupons the user has paid to reveal
pub async fn fetch_coupons_redeemed(client: &DealVistaClient) -> Result<Vec<RedeemedCoupon>> {
    client.get_coupons_redeemed().await
}

/// Recent activity, newest first
pub async fn fetch_logs(client: &DealVistaClient) -> Result<Vec<LogEntry>> {
    client.get_logs().await
}
