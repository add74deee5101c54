//! Page/limit request parsing and page metadata.

use serde::{Deserialize, Serialize};

/// Page used when the caller supplies none (or an unusable value).
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller supplies none (or an unusable value).
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Validated page/limit pair.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::parse(Some("3"), Some("abc"));
/// assert_eq!(request.page(), 3);
/// assert_eq!(request.limit(), 10);
/// assert_eq!(request.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from numeric values, substituting defaults for zero
    /// and clamping `limit` to [`MAX_LIMIT`].
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = if limit == 0 {
            DEFAULT_LIMIT
        } else if limit > MAX_LIMIT {
            MAX_LIMIT
        } else {
            limit
        };
        Self { page, limit }
    }

    /// Parse raw query-string values.
    ///
    /// Missing, blank, non-numeric, negative, or zero values fall back to the
    /// defaults instead of failing the request.
    #[must_use]
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(parse_positive(page), parse_positive(limit))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

fn parse_positive(raw: Option<&str>) -> u32 {
    raw.map(str::trim)
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Pagination metadata returned alongside list payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// One-based page number.
    pub page: u32,
    /// Page size used for the query.
    pub limit: u32,
    /// Total number of rows matching the filter, across all pages.
    pub total: u64,
    /// Number of pages needed to show `total` rows; zero when `total` is zero.
    pub total_pages: u64,
}

impl PageMeta {
    /// Describe `request` given the total number of matching rows.
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(request.limit as u64),
        }
    }
}

/// One page of items together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Metadata describing the page.
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Bundle `items` fetched for `request` with the overall `total`.
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            meta: PageMeta::new(request, total),
        }
    }

    /// Transform each item while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Fallback and metadata arithmetic coverage.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some(""), Some("  "), 1, 10)]
    #[case(Some("abc"), Some("-5"), 1, 10)]
    #[case(Some("0"), Some("0"), 1, 10)]
    #[case(Some("4"), Some("25"), 4, 25)]
    #[case(Some(" 2 "), Some("1000"), 2, MAX_LIMIT)]
    fn parse_falls_back_to_safe_defaults(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::parse(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(20, 2)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] expected_pages: u64) {
        let meta = PageMeta::new(PageRequest::default(), total);
        assert_eq!(meta.total_pages, expected_pages);
    }

    #[rstest]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 7).offset(), 14);
    }

    #[rstest]
    fn map_keeps_metadata() {
        let page = Paginated::new(vec![1, 2], PageRequest::new(1, 2), 9);
        let mapped = page.map(|value| value * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.meta.total_pages, 5);
    }
}
