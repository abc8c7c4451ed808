/// Fixed-size page windowing for list endpoints
///
/// Lists are windowed at a fixed page size of 10; the page size is not
/// client-overridable. Responses carry the total count plus `next` /
/// `previous` links:
///
/// ```json
/// {
///   "count": 15,
///   "next": "/api/tasks/?page=2",
///   "previous": null,
///   "results": [ ... ]
/// }
/// ```
///
/// `next` is null on the last page; `previous` is null on the first page and
/// links to the bare path from page 2 so the first page has a canonical URL.

use serde::Serialize;

/// Tasks per page; not client-overridable
pub const PAGE_SIZE: i64 = 10;

/// A single page of results with navigation links
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: i64,

    /// Link to the next page (null on the last page)
    pub next: Option<String>,

    /// Link to the previous page (null on the first page)
    pub previous: Option<String>,

    /// This page's items
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assembles a page from a result window
    ///
    /// `path` is the request path the links are built from, e.g.
    /// `/api/tasks/`.
    pub fn new(path: &str, page: u64, count: i64, results: Vec<T>) -> Self {
        let next = if (page as i64) * PAGE_SIZE < count {
            Some(format!("{}?page={}", path, page + 1))
        } else {
            None
        };

        let previous = match page {
            0 | 1 => None,
            2 => Some(path.to_string()),
            n => Some(format!("{}?page={}", path, n - 1)),
        };

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

/// Computes the row offset for a 1-based page number
///
/// Returns `None` when the page is out of range: page 0, or any page past
/// the end other than page 1 (an empty list still has a valid first page).
pub fn page_offset(page: u64, count: i64) -> Option<i64> {
    if page == 0 {
        return None;
    }

    let offset = i64::try_from(page - 1).ok()?.checked_mul(PAGE_SIZE)?;
    if page > 1 && offset >= count {
        return None;
    }

    Some(offset)
}
