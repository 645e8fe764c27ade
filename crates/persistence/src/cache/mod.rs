//! In-memory caching layer for coupon detail lookups

use dealvista_core::CouponDetail;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Cached item with expiration
struct CacheEntry {
    value: CouponDetail,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }
}

/// Thread-safe cache for coupon details with TTL and max-entry bounds
///
/// The secret code is stripped before insertion: a reveal is paid for per
/// viewing and its result must never outlive the detail view, so the cache
/// only ever holds the public fields.
pub struct CouponCache {
    coupons: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
    max_entries: usize,
}

impl CouponCache {
    pub fn with_capacity(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            coupons: RwLock::new(HashMap::new()),
            default_ttl,
            max_entries,
        }
    }

    pub fn new(default_ttl: Duration) -> Self {
        Self::with_capacity(default_ttl, 200)
    }

    /// Get a coupon detail from cache if not expired (code always absent)
    pub fn get(&self, coupon_id: &str) -> Option<CouponDetail> {
        let cache = self.coupons.read().ok()?;
        let entry = cache.get(coupon_id)?;

        if entry.is_expired() {
            None
        } else {
            Some(entry.value.clone())
        }
    }

    /// Insert or update a coupon detail, dropping its code first.
    /// Evicts expired entries if at capacity, then the oldest entry.
    pub fn insert(&self, detail: CouponDetail) {
        if let Ok(mut cache) = self.coupons.write() {
            if cache.len() >= self.max_entries {
                cache.retain(|_, entry| !entry.is_expired());
            }

            if cache.len() >= self.max_entries {
                if let Some(oldest_key) = cache
                    .iter()
                    .min_by_key(|(_, e)| e.inserted_at)
                    .map(|(k, _)| k.clone())
                {
                    cache.remove(&oldest_key);
                }
            }

            let detail = detail.without_code();
            cache.insert(
                detail.coupon.id.clone(),
                CacheEntry {
                    value: detail,
                    inserted_at: Instant::now(),
                    ttl: self.default_ttl,
                },
            );
        }
    }

    /// Remove a coupon from cache (its sold count changes after a reveal)
    pub fn invalidate(&self, coupon_id: &str) {
        if let Ok(mut cache) = self.coupons.write() {
            cache.remove(coupon_id);
        }
    }

    /// Clear all expired entries
    pub fn cleanup(&self) {
        if let Ok(mut cache) = self.coupons.write() {
            cache.retain(|_, entry| !entry.is_expired());
        }
    }

    /// Clear entire cache
    pub fn clear(&self) {
        if let Ok(mut cache) = self.coupons.write() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.coupons.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CouponCache {
    fn default() -> Self {
        // 60 second TTL; listings only drift when someone redeems
        Self::with_capacity(Duration::from_secs(60), 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealvista_core::Coupon;

    fn detail(id: &str, code: Option<&str>) -> CouponDetail {
        CouponDetail {
            coupon: Coupon {
                id: id.to_string(),
                title: "20% off".into(),
                description: None,
                platform: "Zomato".into(),
                category: "Food".into(),
                discount_type: None,
                discount_value: None,
                min_order_value: None,
                max_discount_value: None,
                valid_from: None,
                valid_till: None,
                terms_conditions: None,
                requires_unique_user: false,
                usage_type: None,
                geo_restriction: None,
                is_active: true,
                sold_quantity: 0,
                redeem_cost: None,
                created_at: None,
            },
            code: code.map(String::from),
            total_quantity: None,
        }
    }

    #[test]
    fn test_cache_never_stores_the_code() {
        let cache = CouponCache::default();
        cache.insert(detail("c1", Some("SECRET20")));
        let cached = cache.get("c1").unwrap();
        assert!(cached.code.is_none());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = CouponCache::default();
        cache.insert(detail("c1", None));
        assert_eq!(cache.len(), 1);
        cache.invalidate("c1");
        assert!(cache.get("c1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = CouponCache::with_capacity(Duration::from_secs(60), 2);
        cache.insert(detail("a", None));
        cache.insert(detail("b", None));
        cache.insert(detail("c", None));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("c").is_some());
    }
}
