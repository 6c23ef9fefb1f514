//! Page-window normalization for customer and catalog listings.
//!
//! Callers hand a raw 1-based page request to a repository; `normalize`
//! turns it into the 0-based index and clamped page size the paginator
//! expects, so oversized or zero inputs can never reach a query.

/// Hard cap on rows a single listing call may return.
pub const MAX_PER_PAGE: u32 = 100;

/// Page size applied when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// A 1-based page request as it arrives at the service layer.
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// 0-based page index and per-page count clamped to `1..=MAX_PER_PAGE`,
    /// widened to the `u64` shapes the paginator takes. Page 0 is read as
    /// page 1.
    pub fn normalize(self) -> (u64, u64) {
        let page_idx = u64::from(self.page.max(1) - 1);
        let per_page = u64::from(self.per_page.clamp(1, MAX_PER_PAGE));
        (page_idx, per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PER_PAGE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_zero_reads_the_first_page() {
        let (idx, per) = Pagination::new(0, 0).normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn per_page_is_clamped_to_the_listing_cap() {
        let (idx, per) = Pagination::new(5, 1_000).normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, u64::from(MAX_PER_PAGE));
    }

    #[test]
    fn default_is_the_first_listing_page() {
        let (idx, per) = Pagination::default().normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, u64::from(DEFAULT_PER_PAGE));
    }
}
