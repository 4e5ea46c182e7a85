//! Pagination types for list operations.
//!
//! Pages are 1-indexed on the wire; `offset()` converts to the 0-based
//! row offset used by the query engines.

use serde::{Deserialize, Serialize};

/// A request for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub limit: u32,
}

impl PageRequest {
    /// The page returned when none is requested.
    pub const DEFAULT_PAGE: u32 = 1;
    /// The default page size.
    pub const DEFAULT_LIMIT: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a new page request, clamping both values into range.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
    }

    /// Builds a request from raw query-string values.
    ///
    /// Only the leading digits count, so `"2abc"` and `"2.5"` read as `2`.
    /// Missing, non-numeric and non-positive values fall back to the
    /// defaults instead of failing the request. `limit` is capped at
    /// [`MAX_LIMIT`](Self::MAX_LIMIT) so one request cannot pull an entire
    /// ledger.
    #[must_use]
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_positive(page).unwrap_or(Self::DEFAULT_PAGE);
        let limit = parse_positive(limit).unwrap_or(Self::DEFAULT_LIMIT);
        Self::new(page, limit)
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let value = raw?.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let digits = &value[..end];
    if digits.is_empty() {
        return None;
    }
    // Only overflow can fail here.
    let parsed = digits.parse::<u32>().unwrap_or(u32::MAX);
    (parsed >= 1).then_some(parsed)
}

/// Pagination metadata returned alongside a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Number of items matching the query across all pages.
    pub total: u64,
    /// The current page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub limit: u32,
    /// `ceil(total / limit)`; zero when nothing matches.
    pub total_pages: u64,
}

impl PageInfo {
    /// Creates page metadata for a request and a total count.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit);
        let total_pages = if limit > 0 { total.div_ceil(limit) } else { 0 };

        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub content: Vec<T>,
    /// Information about this page.
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            content,
            info: PageInfo::new(request, total),
        }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            info: self.info,
        }
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if there is a page after this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.info.page) < self.info.total_pages
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(2, 10).offset(), 10);
        assert_eq!(PageRequest::new(5, 15).offset(), 60);
    }

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 1000);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, PageRequest::MAX_LIMIT);
    }

    #[test]
    fn test_from_raw_defaults() {
        assert_eq!(PageRequest::from_raw(None, None), PageRequest::new(1, 10));
        assert_eq!(PageRequest::from_raw(Some("abc"), Some("")), PageRequest::new(1, 10));
        assert_eq!(PageRequest::from_raw(Some("0"), Some("-5")), PageRequest::new(1, 10));
        assert_eq!(PageRequest::from_raw(Some("3"), Some("25")), PageRequest::new(3, 25));
    }

    #[test]
    fn test_from_raw_reads_leading_digits() {
        assert_eq!(PageRequest::from_raw(Some("2abc"), Some("15items")), PageRequest::new(2, 15));
        assert_eq!(PageRequest::from_raw(Some(" 4"), Some("2.9")), PageRequest::new(4, 2));
        assert_eq!(PageRequest::from_raw(Some("+3"), Some("x5")), PageRequest::new(3, 10));
        assert_eq!(PageRequest::from_raw(Some("0x7"), Some("-2abc")), PageRequest::new(1, 10));
    }

    #[test]
    fn test_from_raw_caps_limit() {
        assert_eq!(PageRequest::from_raw(None, Some("500")).limit, PageRequest::MAX_LIMIT);
        let huge = PageRequest::from_raw(Some("99999999999"), None);
        assert_eq!(huge.page, u32::MAX);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PageInfo::new(PageRequest::new(1, 10), 15).total_pages, 2);
        assert_eq!(PageInfo::new(PageRequest::new(1, 5), 11).total_pages, 3);
        assert_eq!(PageInfo::new(PageRequest::new(1, 10), 10).total_pages, 1);
        assert_eq!(PageInfo::new(PageRequest::new(1, 10), 0).total_pages, 0);
    }

    #[test]
    fn test_page_past_the_end() {
        let page: Page<i32> = Page::new(Vec::new(), PageRequest::new(9, 10), 15);
        assert!(page.is_empty());
        assert_eq!(page.info.total, 15);
        assert_eq!(page.info.total_pages, 2);
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_info_serializes_camel_case() {
        let info = PageInfo::new(PageRequest::new(2, 10), 15);
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "total": 15, "page": 2, "limit": 10, "totalPages": 2 })
        );
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], PageRequest::first(), 3);
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.content, vec![2, 4, 6]);
        assert_eq!(mapped.len(), 3);
    }
}
