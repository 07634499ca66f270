//! Pagination models shared by all list endpoints

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Normalized page parameters (1-based)
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page_number: u32,
    pub page_size: u32,
}

impl PageParams {
    /// Clamp raw query values: page >= 1, size within 1..=MAX_PAGE_SIZE
    pub fn new(page_number: Option<u32>, page_size: Option<u32>) -> Self {
        let page_number = page_number.unwrap_or(1).max(1);
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        Self {
            page_number,
            page_size,
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page_number - 1) * i64::from(self.page_size)
    }
}

/// Pagination metadata attached to list responses
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// A page of items plus its metadata
#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PagedResponse<T> {
    pub fn new(items: Vec<T>, total_count: i64, params: &PageParams) -> Self {
        let page_size = i64::from(params.page_size);
        let total_pages = (total_count + page_size - 1) / page_size;
        let current = i64::from(params.page_number);

        Self {
            items,
            pagination: PaginationMeta {
                current_page: params.page_number,
                page_size: params.page_size,
                total_count,
                total_pages,
                has_next_page: current < total_pages,
                has_previous_page: params.page_number > 1,
            },
        }
    }
}
