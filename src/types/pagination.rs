//! Pagination and search parameters for list endpoints.
//!
//! Listings are scoped to the caller first, then filtered by the search
//! term, then paged.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Query parameters shared by every list endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring search term
    pub q: Option<String>,
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (capped at 100)
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl ListQuery {
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref()
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            q: None,
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Page selection
#[derive(Debug, Clone, Copy)]
pub struct PaginationParams {
    pub page: u64,
    pub per_page: u64,
}

impl PaginationParams {
    /// Page number, never below 1
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Offset of the first item on the page
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }

    /// Page size clamped to 1..=MAX_PAGE_SIZE
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    PaginatedAccountants = Paginated<crate::domain::AccountantResponse>,
    PaginatedClients = Paginated<crate::domain::ClientView>,
    PaginatedDocuments = Paginated<crate::domain::Document>,
    PaginatedDeleteRequests = Paginated<crate::domain::DeleteRequestView>
)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Cut one page out of an already scoped and filtered listing.
    pub fn from_items(items: Vec<T>, params: PaginationParams) -> Self {
        let total = items.len() as u64;
        let data = items
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.limit() as usize)
            .collect();

        Self::new(data, params.page(), params.limit(), total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_pages() {
        let params = PaginationParams { page: 2, per_page: 2 };
        let page = Paginated::from_items(vec![1, 2, 3, 4, 5], params);
        assert_eq!(page.data, vec![3, 4]);
        assert_eq!(
            page.meta,
            PaginationMeta {
                page: 2,
                per_page: 2,
                total: 5,
                total_pages: 3
            }
        );
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let params = PaginationParams { page: 9, per_page: 10 };
        let page = Paginated::from_items(vec!["a"], params);
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total, 1);
    }

    #[test]
    fn test_limits_are_clamped() {
        let params = PaginationParams { page: 0, per_page: 10_000 };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }
}
