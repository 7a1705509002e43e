//! Pagination types for list operations.
//!
//! Clients ask for a one-based `page` and a `page_size`, either of which may
//! be absent or out of range. [`normalize`] turns that request into a
//! [`PageWindow`] holding the zero-based page index, a bounded page size and
//! the number of items to skip.

use serde::{Deserialize, Serialize};

/// Service-level pagination limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request omits it or asks for a non-positive one.
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Largest page size a client may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
}

fn default_page_size() -> i64 {
    10
}

fn default_max_page_size() -> i64 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PaginationConfig {
    /// Creates a configuration with the given default and maximum.
    pub fn new(default_page_size: i64, max_page_size: i64) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }
}

/// A page request as received from a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// One-based page number.
    pub page: Option<i64>,
    /// Requested number of items per page.
    pub page_size: Option<i64>,
}

impl PageRequest {
    /// Creates a request.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self { page, page_size }
    }

    /// Normalizes the request against `config`.
    pub fn normalize(&self, config: &PaginationConfig) -> PageWindow {
        normalize(self.page, self.page_size, config)
    }
}

/// A validated slice of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Zero-based page index.
    pub page_index: u64,
    /// Effective page size, used as the list limit.
    pub page_size: u64,
    /// Number of items to skip.
    pub skip: u64,
}

/// Largest skip a backend accepts; drivers send skip as a signed 64-bit value.
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Converts optional page/page-size parameters into a [`PageWindow`].
///
/// - a missing page is page 1, and pages below 1 clamp to the first page;
/// - a missing page size takes the configured default;
/// - a page size above the maximum clamps to the maximum;
/// - a non-positive page size resets to the default (not the maximum).
pub fn normalize(page: Option<i64>, page_size: Option<i64>, config: &PaginationConfig) -> PageWindow {
    let page_index = page.unwrap_or(1).saturating_sub(1).max(0);

    let mut effective = page_size.unwrap_or(config.default_page_size);
    if effective > config.max_page_size {
        effective = config.max_page_size;
    }
    if effective <= 0 {
        effective = config.default_page_size;
    }

    let page_index = u64::try_from(page_index).unwrap_or(0);
    let page_size = u64::try_from(effective).unwrap_or(0);

    PageWindow {
        page_index,
        page_size,
        skip: page_index.saturating_mul(page_size).min(MAX_SKIP),
    }
}
