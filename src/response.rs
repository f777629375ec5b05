use serde::Serialize;
use utoipa::ToSchema;

use crate::repository::Page;

/// Paging information for list responses.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    pub total_count: Option<u64>,
    pub total_pages: Option<u64>,
    pub has_previous: Option<bool>,
    pub has_next: Option<bool>,
}

impl Meta {
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            page_index: Some(page.page_index),
            page_size: Some(page.page_size),
            total_count: Some(page.total_count),
            total_pages: Some(page.total_pages),
            has_previous: Some(page.has_previous()),
            has_next: Some(page.has_next()),
        }
    }

    pub fn empty() -> Self {
        Self {
            page_index: None,
            page_size: None,
            total_count: None,
            total_pages: None,
            has_previous: None,
            has_next: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Wraps a page of items, carrying its counters in `meta`.
    pub fn page(message: impl Into<String>, page: Page<T>) -> Self {
        let meta = Meta::from_page(&page);
        Self {
            message: message.into(),
            data: Some(page.items),
            meta: Some(meta),
        }
    }
}
