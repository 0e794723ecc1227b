//! Route handlers
//!
//! Organized by resource:
//! - users: user CRUD
//! - posts: site-wide and user-scoped post queries
//! - health: liveness probe
//!
//! The envelope types shared by every list/item response live here.

pub mod health;
pub mod posts;
pub mod users;

use serde::Serialize;

use crate::models::{CollectionLinks, Paginated, ValidationError};

/// Single-item envelope: `{"data": {...}}`
#[derive(Serialize)]
pub struct ItemEnvelope<T> {
    pub data: T,
}

/// List envelope: data plus pagination metadata and collection hyperlinks
#[derive(Serialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
    #[serde(rename = "_links")]
    pub links: CollectionLinks,
}

/// Pagination metadata block
#[derive(Serialize)]
pub struct PageMeta {
    total: i64,
    page: u32,
    limit: u32,
    total_pages: u32,
}

impl PageMeta {
    pub fn of<T>(result: &Paginated<T>) -> Self {
        Self {
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages(),
        }
    }
}

/// Path ids must be positive; the router's integer parse handles the rest.
fn positive_id(field: &'static str, id: i64) -> Result<i64, ValidationError> {
    if id >= 1 {
        Ok(id)
    } else {
        Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a positive integer",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_meta_mirrors_result() {
        let result: Paginated<()> = Paginated {
            items: vec![],
            total: 12,
            page: 2,
            limit: 5,
        };
        let meta = PageMeta::of(&result);
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["total"], 12);
        assert_eq!(value["page"], 2);
        assert_eq!(value["limit"], 5);
        assert_eq!(value["total_pages"], 3);
    }

    #[test]
    fn rejects_non_positive_ids() {
        assert!(positive_id("id", 1).is_ok());
        assert!(positive_id("id", 0).is_err());
        assert!(positive_id("id", -3).is_err());
    }
}
