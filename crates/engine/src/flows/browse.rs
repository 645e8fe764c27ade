//! Browse controller - catalog paging and presentation refinements
//!
//! Holds the last server-returned page verbatim and the query that produced
//! it. Searches are identified by monotonically increasing tickets so that
//! out-of-order responses resolve last-request-wins.

use tracing::debug;

use dealvista_core::{CatalogPage, CatalogQuery, Coupon, SortBy};

/// Identifies one issued search; only the latest ticket may apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Catalog browsing state
#[derive(Debug)]
pub struct BrowseController {
    query: CatalogQuery,
    verified_only: bool,
    page: CatalogPage,
    issued: u64,
}

impl BrowseController {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: CatalogQuery {
                page_size: Some(page_size),
                ..Default::default()
            },
            verified_only: true,
            page: CatalogPage::empty(),
            issued: 0,
        }
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// The most recent server response, verbatim
    pub fn page(&self) -> &CatalogPage {
        &self.page
    }

    pub fn verified_only(&self) -> bool {
        self.verified_only
    }

    /// Presentation-only toggle; no refetch
    pub fn set_verified_only(&mut self, verified_only: bool) {
        self.verified_only = verified_only;
    }

    /// Presentation-only sort mode; no refetch
    pub fn set_sort(&mut self, sort_by: SortBy) {
        self.query.sort_by = sort_by;
    }

    /// Start a fresh search from page zero
    ///
    /// Returns the ticket and the query snapshot the driver should send.
    pub fn begin_search(&mut self, query: CatalogQuery) -> (SearchTicket, CatalogQuery) {
        self.query = CatalogQuery {
            page_size: self.query.page_size.or(query.page_size),
            ..query
        }
        .with_page(0);
        self.issue()
    }

    /// Re-run the current query (e.g. a manual refresh)
    pub fn begin_refresh(&mut self) -> (SearchTicket, CatalogQuery) {
        self.issue()
    }

    /// Navigate to a page of the current result set
    ///
    /// Out-of-range targets (including negatives) are ignored rather than
    /// erroring: a disabled pagination control, not a failure. Re-requesting
    /// the current page is allowed and fetches the same content.
    pub fn begin_page(&mut self, page: i64) -> Option<(SearchTicket, CatalogQuery)> {
        if page < 0 || page >= i64::from(self.page.total_pages) {
            debug!("Ignoring out-of-range page navigation to {}", page);
            return None;
        }
        self.query.page = page as u32;
        Some(self.issue())
    }

    fn issue(&mut self) -> (SearchTicket, CatalogQuery) {
        self.issued += 1;
        (SearchTicket(self.issued), self.query.clone())
    }

    /// Apply a search response; stale responses are discarded
    ///
    /// Returns whether the page was accepted. Only the most recently issued
    /// ticket wins; anything older lost the race to a newer request.
    pub fn apply_response(&mut self, ticket: SearchTicket, page: CatalogPage) -> bool {
        if ticket.0 != self.issued {
            debug!("Discarding stale search response (ticket {})", ticket.0);
            return false;
        }
        self.query.page = page.current_page;
        self.page = page;
        true
    }

    /// A failed search keeps the previous page of results
    pub fn apply_failure(&mut self, ticket: SearchTicket) {
        if ticket.0 == self.issued {
            debug!("Search {} failed; keeping previous results", ticket.0);
        }
    }

    /// Items to render, with local refinements applied
    pub fn refined(&self) -> Vec<Coupon> {
        apply_local_refinements(&self.page, self.verified_only, self.query.sort_by)
    }
}

/// Presentation-only refinements the server does not perform
///
/// Drops unverified items when `verified_only`; re-sorts by nearest expiry
/// for [`SortBy::ExpiringSoon`] with undated items last. Every other mode
/// preserves server order. Recomputed per render; the stored page is never
/// mutated.
pub fn apply_local_refinements(
    page: &CatalogPage,
    verified_only: bool,
    sort_by: SortBy,
) -> Vec<Coupon> {
    let mut items: Vec<Coupon> = page
        .coupons
        .iter()
        .filter(|c| !verified_only || c.is_verified())
        .cloned()
        .collect();

    if sort_by == SortBy::ExpiringSoon {
        items.sort_by_key(|c| match c.valid_till {
            Some(date) => (0, date),
            None => (1, chrono::NaiveDate::MAX),
        });
    }

    items
}
