//! Catalog query and paginated listing models

use serde::{Deserialize, Serialize};

use crate::models::{Coupon, DiscountType};

/// Default page size used by the browse endpoint
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort modes offered by the browse view
///
/// Only `ExpiringSoon` reorders on the client; the server returns latest
/// first and `MostPopular` relies on that server order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    Latest,
    ExpiringSoon,
    MostPopular,
}

impl SortBy {
    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Latest => "Latest",
            SortBy::ExpiringSoon => "Expiring Soon",
            SortBy::MostPopular => "Most Popular",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Latest" => Some(SortBy::Latest),
            "Expiring Soon" => Some(SortBy::ExpiringSoon),
            "Most Popular" => Some(SortBy::MostPopular),
            _ => None,
        }
    }
}

/// Filters and paging for a catalog search
///
/// Unset fields are omitted from the request entirely rather than sent as
/// wildcards. `sort_by` is presentation state and never transmitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub platform: Option<String>,
    pub category: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub search: Option<String>,
    pub sort_by: SortBy,
    pub page: u32,
    pub page_size: Option<u32>,
    /// Hidden listings are excluded unless explicitly requested
    pub include_inactive: bool,
}

impl CatalogQuery {
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Same query pointed at a different page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// Paginated listing from `GET /coupons`
///
/// Held verbatim as the server returned it; pages are never merged on the
/// client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub coupons: Vec<Coupon>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_previous: bool,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl CatalogPage {
    /// Empty page shown before the first fetch and after a failed one
    pub fn empty() -> Self {
        Self {
            coupons: Vec::new(),
            current_page: 0,
            total_pages: 0,
            total_items: 0,
            page_size: DEFAULT_PAGE_SIZE,
            has_next: false,
            has_previous: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

impl Default for CatalogPage {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_labels_round_trip() {
        for sort in [SortBy::Latest, SortBy::ExpiringSoon, SortBy::MostPopular] {
            assert_eq!(SortBy::from_label(sort.label()), Some(sort));
        }
        assert_eq!(SortBy::from_label("Oldest"), None);
    }

    #[test]
    fn test_catalog_page_parses_server_shape() {
        let json = r#"{
            "coupons": [
                {"id": "a", "title": "t", "platform": "Amazon", "category": "Shopping"}
            ],
            "currentPage": 0,
            "totalPages": 1,
            "totalItems": 1,
            "pageSize": 10,
            "hasNext": false,
            "hasPrevious": false
        }"#;
        let page: CatalogPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.coupons.len(), 1);
        assert!(!page.has_next);
        assert_eq!(page.total_items, 1);
    }
}
