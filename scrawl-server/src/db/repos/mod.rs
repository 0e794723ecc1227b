//! Repository implementations for database access
//!
//! Repositories return `Option`/`bool` for zero-row outcomes — absence is
//! data, not an error. Only unexpected store failures surface as `DbError`.

pub mod posts;
pub mod users;

pub use posts::{Post, PostFilter, PostRepo, PostWithComments};
pub use users::{User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// True when the underlying failure is a unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Sqlx(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}
