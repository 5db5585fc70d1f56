//! Paginated collections and pager math

use serde::Deserialize;

/// One page of a server-side collection
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawPage<T>")]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,

    /// Total number of rows matching the filters
    pub total: u64,

    /// Rows per page as reported by the server
    pub per_page: u64,
}

impl<T> Page<T> {
    /// Number of pages the collection spans
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.per_page)
    }
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    per_page: u64,
}

// Users and reports answer `{data, total, per_page}`, ads nest the
// counters under `meta`.
#[derive(Debug, Deserialize)]
struct RawPage<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    total: Option<u64>,
    per_page: Option<u64>,
    meta: Option<PageMeta>,
}

impl<T> From<RawPage<T>> for Page<T> {
    fn from(raw: RawPage<T>) -> Self {
        let (meta_total, meta_per_page) = raw
            .meta
            .map(|meta| (Some(meta.total), Some(meta.per_page)))
            .unwrap_or((None, None));

        Page {
            items: raw.data,
            total: raw.total.or(meta_total).unwrap_or(0),
            per_page: raw.per_page.or(meta_per_page).unwrap_or(0),
        }
    }
}

/// `ceil(total / per_page)`, or 0 when `per_page` is 0
pub fn total_pages(total: u64, per_page: u64) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let pages = total.div_ceil(per_page);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Position within a paginated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// Current page, starting at 1
    pub page: u32,

    /// Number of pages
    pub total_pages: u32,
}

impl Pager {
    /// Create a pager
    pub fn new(page: u32, total_pages: u32) -> Self {
        Self { page, total_pages }
    }

    /// Whether the "previous" control is enabled
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether the "next" control is enabled
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether the pager is shown at all
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }
}
