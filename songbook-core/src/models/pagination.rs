//! Pagination types

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination parameters
///
/// Unlike a clamping paginator, out-of-range values are rejected so the
/// caller learns about them instead of silently getting a different page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (1..=100)
    pub page_size: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Page must be at least 1
    /// - Page size must be within 1..=100
    pub fn new(page: u32, page_size: u32) -> Result<Self, ValidationError> {
        if page < 1 {
            return Err(ValidationError::OutOfRange {
                field: "page",
                reason: "must be at least 1",
            });
        }

        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::OutOfRange {
                field: "page_size",
                reason: "must be between 1 and 100",
            });
        }

        Ok(Self { page, page_size })
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            items,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        let p = Pagination::new(1, 10).unwrap();
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(2, 10).unwrap();
        assert_eq!(p.offset(), 10);
        assert_eq!(p.limit(), 10);

        let p = Pagination::new(3, 25).unwrap();
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn offset_does_not_overflow_u32() {
        let p = Pagination::new(u32::MAX, MAX_PAGE_SIZE).unwrap();
        assert_eq!(p.offset(), (i64::from(u32::MAX) - 1) * 100);
    }

    #[test]
    fn rejects_page_zero() {
        let err = Pagination::new(0, 10).unwrap_err();
        assert_eq!(err.field(), "page");
    }

    #[test]
    fn rejects_page_size_out_of_range() {
        assert!(matches!(
            Pagination::new(1, 0),
            Err(ValidationError::OutOfRange { field: "page_size", .. })
        ));
        assert!(Pagination::new(1, 101).is_err());
        assert!(Pagination::new(1, 100).is_ok());
    }

    #[test]
    fn default_is_first_page() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
    }
}
