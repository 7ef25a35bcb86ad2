//! Pagination types shared across gateway endpoints

use serde::{Deserialize, Serialize};

/// Client-side pagination cursor.
///
/// Mirrors the gateway's `meta` block. `current_page` stays within
/// `[1, last_page]` whenever `last_page >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            per_page: 20,
            total: 0,
        }
    }
}

impl Pagination {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Overwrite the cursor from a gateway `meta` block.
    pub fn apply_meta(&mut self, meta: &PaginationMeta) {
        self.current_page = meta.current_page;
        self.last_page = meta.last_page;
        self.per_page = meta.per_page;
        self.total = meta.total;
    }

    /// Page numbers to display: a window of up to `max_pages` contiguous
    /// pages centered on the current page and clamped to `[1, last_page]`.
    pub fn page_numbers(&self, max_pages: u32) -> Vec<u32> {
        if max_pages == 0 {
            return Vec::new();
        }

        let half = max_pages / 2;
        let mut start = self.current_page.saturating_sub(half).max(1);
        let end = self.last_page.min(start + max_pages - 1);

        // Shift the window left when it got cut short at the last page.
        if end.saturating_sub(start) < max_pages - 1 {
            start = end.saturating_sub(max_pages - 1).max(1);
        }

        (start..=end).collect()
    }
}

/// Pagination metadata as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
}

/// A page of items plus optional cursor metadata.
///
/// When `meta` is absent the caller keeps its prior cursor values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PaginationMeta>,
}
