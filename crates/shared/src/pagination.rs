//! Offset pagination helpers for listing endpoints.

use serde::{Deserialize, Serialize};

/// Default page size for listings.
pub const DEFAULT_PER_PAGE: i64 = 25;

/// Hard ceiling on page size.
pub const MAX_PER_PAGE: i64 = 100;

/// Query parameters for paginated listings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageParams {
    /// Clamps page/per_page into valid ranges.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// SQL LIMIT for this page.
    pub fn limit(&self) -> i64 {
        self.clamped().per_page
    }

    /// SQL OFFSET for this page.
    pub fn offset(&self) -> i64 {
        let c = self.clamped();
        (c.page - 1) * c.per_page
    }
}

/// Pagination metadata returned alongside listing data.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl PageInfo {
    pub fn new(params: PageParams, total: i64) -> Self {
        let c = params.clamped();
        Self {
            page: c.page,
            per_page: c.per_page,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, DEFAULT_PER_PAGE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_offset_computation() {
        let params = PageParams {
            page: 3,
            per_page: 10,
        };
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn test_clamping() {
        let params = PageParams {
            page: 0,
            per_page: 5000,
        };
        let c = params.clamped();
        assert_eq!(c.page, 1);
        assert_eq!(c.per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_page_info() {
        let info = PageInfo::new(
            PageParams {
                page: 2,
                per_page: 25,
            },
            120,
        );
        assert_eq!(info.page, 2);
        assert_eq!(info.total, 120);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, DEFAULT_PER_PAGE);
    }
}
