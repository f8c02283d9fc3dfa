//! # Pagination Support
//!
//! Pagination structures and utilities for database queries.

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Create new pagination with limit and offset
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Create pagination for a specific page (1-indexed)
    pub fn page(page: u32, page_size: u32) -> Self {
        let offset = if page > 0 { (page - 1) * page_size } else { 0 };
        Self {
            limit: page_size,
            offset,
        }
    }
}

/// Paginated query result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub limit: u32,
    pub offset: u32,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(items: Vec<T>, total_count: u64, pagination: Pagination) -> Self {
        Self {
            items,
            total_count,
            limit: pagination.limit,
            offset: pagination.offset,
        }
    }

    /// Check if more items exist beyond this page
    pub fn has_more(&self) -> bool {
        (self.offset as u64 + self.items.len() as u64) < self.total_count
    }
}
