//! Pagination state carried by list requests and list responses.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// First page number.
pub const FIRST_PAGE: u32 = 1;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Header carrying the current page on legacy list endpoints.
pub const PAGE_HEADER: &str = "X-Page";

/// Header carrying the total page count on legacy list endpoints.
pub const PAGES_HEADER: &str = "X-Pages";

/// Paging cursor embedded in every list request's filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFilters {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PageFilters {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageFilters {
    /// Paging for a specific page.
    #[must_use]
    pub fn for_page(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// The cursor for the following page, or `None` past the last page
    /// number `u32` can hold.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        let page = self.page.checked_add(1)?;
        Some(Self { page, ..self })
    }
}

/// `meta` block of current-generation list responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub page: PageMeta,
}

/// Page description inside [`ListMeta`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub page_offset: u32,
    #[serde(default)]
    pub page_size: u32,
    /// Total number of matching items, when reported.
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub has_more: bool,
}

impl ListMeta {
    /// Whether the server reported a further page.
    pub fn has_more(&self) -> bool {
        self.page.has_more
    }
}

/// Read the legacy has-more signal from `X-Page` / `X-Pages` headers.
///
/// Missing or unparsable headers mean there is no further page.
pub fn has_more_from_headers(headers: &HeaderMap) -> bool {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
    };

    match (read(PAGE_HEADER), read(PAGES_HEADER)) {
        (Some(page), Some(pages)) => page < pages,
        _ => false,
    }
}
