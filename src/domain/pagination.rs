//! Pagination parameters and metadata

use serde::{Deserialize, Serialize};

use super::DomainError;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    offset: i64,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Result<Self, DomainError> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(DomainError::InvalidLimit(format!(
                "limit must be between 1 and {} (got {})",
                MAX_LIMIT, limit
            )));
        }
        if offset < 0 {
            return Err(DomainError::InvalidOffset(format!(
                "offset must be 0 or greater (got {})",
                offset
            )));
        }
        Ok(Self { limit, offset })
    }

    /// Build from raw query string values; missing or blank values take defaults.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Result<Self, DomainError> {
        let limit = match non_blank(limit) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| DomainError::InvalidLimit(format!("'{}' is not a number", raw)))?,
            None => DEFAULT_LIMIT,
        };
        let offset = match non_blank(offset) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| DomainError::InvalidOffset(format!("'{}' is not a number", raw)))?,
            None => 0,
        };
        Self::new(limit, offset)
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Pagination block returned alongside a page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub pages: i64,
}

impl PaginationMetadata {
    pub fn new(total: i64, pagination: Pagination) -> Self {
        let limit = pagination.limit();
        // ceil(total / limit), never fewer than one page
        let pages = ((total + limit - 1) / limit).max(1);
        Self {
            total,
            limit,
            offset: pagination.offset(),
            pages,
        }
    }
}
