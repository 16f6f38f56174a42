use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, PageRequest, PaginationMeta};
use crate::models::Calculation;

/// Raw history query string.
///
/// Values are kept as text so that garbage falls back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Page size, default 50, capped at 100
    pub limit: Option<String>,
    /// Records to skip, default 0
    pub offset: Option<String>,
}

impl HistoryQuery {
    pub fn page(&self) -> PageRequest {
        let limit = parse_number(self.limit.as_deref())
            .filter(|limit| *limit >= 1)
            .map_or(DEFAULT_PAGE_LIMIT, |limit| limit.min(MAX_PAGE_LIMIT));

        let offset = parse_number(self.offset.as_deref())
            .filter(|offset| *offset >= 0)
            .unwrap_or(0);

        PageRequest::new(limit, offset).unwrap_or_default()
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub calculations: Vec<Calculation>,
    pub pagination: PaginationMeta,
}

impl HistoryResponse {
    pub fn new(calculations: Vec<Calculation>, page: PageRequest, total: i64) -> Self {
        Self {
            calculations,
            pagination: PaginationMeta::new(page, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> PageRequest {
        HistoryQuery {
            limit: limit.map(String::from),
            offset: offset.map(String::from),
        }
        .page()
    }

    #[test]
    fn test_defaults_when_missing() {
        let page = query(None, None);
        assert_eq!(page.limit(), 50);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_defaults_when_not_numeric() {
        let page = query(Some("lots"), Some("abc"));
        assert_eq!(page.limit(), 50);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_out_of_range_values() {
        assert_eq!(query(Some("0"), None).limit(), 50);
        assert_eq!(query(Some("-3"), None).limit(), 50);
        assert_eq!(query(Some("500"), None).limit(), 100);
        assert_eq!(query(None, Some("-1")).offset(), 0);
    }

    #[test]
    fn test_explicit_values() {
        let page = query(Some("5"), Some("10"));
        assert_eq!(page.limit(), 5);
        assert_eq!(page.offset(), 10);
    }

    #[test]
    fn test_max_offset_gives_empty_last_page() {
        let max = i64::MAX.to_string();
        let page = query(None, Some(&max));
        assert_eq!(page.offset(), i64::MAX);

        let meta = PaginationMeta::new(page, 3);
        assert!(!meta.has_more);
    }
}
