//! Page/limit offset pagination for list endpoints.
//!
//! Clients pass `?page=2&limit=10`; responses carry a `pagination` block
//! with the page, limit, total row count, and page count.

use serde::{Deserialize, Serialize};

/// Raw pagination query parameters as they arrive on a list route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageParams {
    /// Validate and normalize, applying the route's default page size.
    ///
    /// Page is 1-based and floors at 1; limit is clamped to 1-100.
    pub fn validate(&self, default_limit: u32) -> ValidatedPage {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, 100);
        ValidatedPage { page, limit }
    }
}

/// Validated and normalized pagination arguments.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedPage {
    pub page: u32,
    pub limit: u32,
}

impl ValidatedPage {
    /// SQL OFFSET for this page.
    pub fn offset(&self) -> i64 {
        ((self.page - 1) as i64) * (self.limit as i64)
    }

    /// SQL LIMIT for this page.
    pub fn fetch_limit(&self) -> i64 {
        self.limit as i64
    }

    /// Build the response pagination block from the total row count.
    pub fn info(&self, total: i64) -> PageInfo {
        let pages = if total <= 0 {
            0
        } else {
            (total + self.limit as i64 - 1) / self.limit as i64
        };
        PageInfo {
            page: self.page,
            limit: self.limit,
            total,
            pages,
        }
    }
}

/// Pagination block included in list responses.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_defaults() {
        let params = PageParams::default();
        let validated = params.validate(10);
        assert_eq!(validated.page, 1);
        assert_eq!(validated.limit, 10);
        assert_eq!(validated.offset(), 0);
    }

    #[test]
    fn test_validate_clamps_limit() {
        let params = PageParams {
            page: Some(1),
            limit: Some(500),
        };
        assert_eq!(params.validate(10).limit, 100);

        let params = PageParams {
            page: Some(1),
            limit: Some(0),
        };
        assert_eq!(params.validate(10).limit, 1);
    }

    #[test]
    fn test_validate_floors_page() {
        let params = PageParams {
            page: Some(0),
            limit: None,
        };
        assert_eq!(params.validate(10).page, 1);
    }

    #[test]
    fn test_offset_math() {
        let params = PageParams {
            page: Some(3),
            limit: Some(10),
        };
        let validated = params.validate(10);
        assert_eq!(validated.offset(), 20);
        assert_eq!(validated.fetch_limit(), 10);
    }

    #[test]
    fn test_page_info_rounds_up() {
        let validated = PageParams {
            page: Some(1),
            limit: Some(10),
        }
        .validate(10);

        let info = validated.info(25);
        assert_eq!(info.total, 25);
        assert_eq!(info.pages, 3);

        let info = validated.info(30);
        assert_eq!(info.pages, 3);

        let info = validated.info(0);
        assert_eq!(info.pages, 0);
    }
}
