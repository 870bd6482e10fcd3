use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = (total as f64 / limit as f64).ceil() as i64;
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// One page of results plus its metadata, carried inside the success
/// envelope's `data` field.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            meta: PaginationMeta::new(params.page(), params.limit(), total),
        }
    }
}

/// Offset+limit pagination query parameters with clamped defaults.
#[derive(Debug, Deserialize, Default, IntoParams)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Page number, defaulting to 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, defaulting to 10 and clamped to 1..=100.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}
