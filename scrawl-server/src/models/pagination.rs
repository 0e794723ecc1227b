//! Pagination types and query-parameter parsing

use super::ValidationError;

/// Maximum items per page
const MAX_LIMIT: u32 = 100;

/// Default items per page
const DEFAULT_LIMIT: u32 = 10;

/// Pagination parameters
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination, clamping out-of-range values.
    ///
    /// Handlers validate strictly before this point; the clamp keeps the
    /// repository safe when called from elsewhere.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results plus the total row count ignoring pagination
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Paginated<T> {
    /// Total number of pages: `ceil(total / limit)`, 0 for an empty set.
    pub fn total_pages(&self) -> u32 {
        if self.total <= 0 {
            0
        } else {
            ((self.total as u64 + u64::from(self.limit) - 1) / u64::from(self.limit)) as u32
        }
    }

    /// Check if there's a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Parse a raw `page` query value. Absent means page 1.
pub fn parse_page(raw: Option<&str>) -> Result<u32, ValidationError> {
    match raw {
        None => Ok(1),
        Some(s) => match s.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ValidationError::InvalidFormat {
                field: "page",
                reason: "must be a positive integer",
            }),
        },
    }
}

/// Parse a raw `limit` query value. Absent means the default of 10.
pub fn parse_limit(raw: Option<&str>) -> Result<u32, ValidationError> {
    match raw {
        None => Ok(DEFAULT_LIMIT),
        Some(s) => match s.parse::<u32>() {
            Ok(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
            _ => Err(ValidationError::OutOfRange {
                field: "limit",
                min: 1,
                max: MAX_LIMIT,
            }),
        },
    }
}
