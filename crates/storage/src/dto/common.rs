use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Result, StorageError};

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A validated limit/offset window over the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    offset: i64,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64) -> Result<Self> {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(StorageError::invalid_input(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
        if offset < 0 {
            return Err(StorageError::invalid_input("offset must be >= 0"));
        }
        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(page: PageRequest, total: i64) -> Self {
        Self {
            total,
            limit: page.limit,
            offset: page.offset,
            has_more: page.offset.saturating_add(page.limit) < total,
        }
    }
}

/// Plain confirmation body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_bounds() {
        assert!(PageRequest::new(1, 0).is_ok());
        assert!(PageRequest::new(MAX_PAGE_LIMIT, 10).is_ok());
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(MAX_PAGE_LIMIT + 1, 0).is_err());
        assert!(PageRequest::new(10, -1).is_err());
    }

    #[test]
    fn test_has_more() {
        let page = PageRequest::new(10, 0).unwrap();
        assert!(PaginationMeta::new(page, 11).has_more);
        assert!(!PaginationMeta::new(page, 10).has_more);

        let page = PageRequest::new(10, 20).unwrap();
        assert!(!PaginationMeta::new(page, 5).has_more);
    }

    #[test]
    fn test_has_more_with_huge_offset() {
        let page = PageRequest::new(MAX_PAGE_LIMIT, i64::MAX).unwrap();
        let meta = PaginationMeta::new(page, 3);
        assert!(!meta.has_more);
        assert_eq!(meta.offset, i64::MAX);
    }
}
