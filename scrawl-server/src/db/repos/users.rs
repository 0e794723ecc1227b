//! User repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{Email, Paginated, Pagination, SortOrder, UserSortField, Username};

use super::DbError;

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "id, username, email, created_at, updated_at";

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List users with the total row count ignoring pagination.
    ///
    /// The count runs as its own query rather than a window function so the
    /// total stays correct when the requested page is past the end.
    pub async fn list(
        &self,
        page: Pagination,
        sort: UserSortField,
        order: SortOrder,
    ) -> Result<Paginated<User>, DbError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        // Safe to interpolate: both values come from allow-list enums,
        // never from raw user input.
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY {} {} LIMIT $1 OFFSET $2",
            sort.as_str(),
            order.as_str()
        );

        let items = sqlx::query_as::<_, User>(&query)
            .bind(i64::from(page.limit))
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// Get a single user by id. Absent is not an error.
    pub async fn get(&self, id: i64) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a new user; the store assigns id and both timestamps.
    /// Uniqueness violations propagate as `DbError`.
    pub async fn create(&self, username: Username, email: Email) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(username.as_str())
        .bind(email.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Partial update: only supplied fields change, `updated_at` always
    /// refreshes. Returns `None` if no row matched.
    pub async fn update(
        &self,
        id: i64,
        username: Option<Username>,
        email: Option<Email>,
    ) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(username.as_ref().map(Username::as_str))
        .bind(email.as_ref().map(Email::as_str))
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Delete a user; their posts go with them. True if a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{pool, schema};
    use crate::models::{Email, Username};

    // Run with: DATABASE_URL=postgres://... cargo test -p scrawl-server -- --ignored

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = pool::create_pool(&url).await.expect("pool creation failed");
        schema::ensure_schema(&pool).await.expect("schema bootstrap failed");
        pool
    }

    fn unique(prefix: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{prefix}{nanos}")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_roundtrip() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let name = unique("rt_");
        let created = repo
            .create(
                Username::new(&name).unwrap(),
                Email::new(&format!("{name}@example.com")).unwrap(),
            )
            .await
            .unwrap();

        let fetched = repo.get(created.id).await.unwrap().expect("user missing");
        assert_eq!(fetched.username, name);
        assert_eq!(fetched.email, format!("{name}@example.com"));
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn partial_update_bumps_timestamp() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let name = unique("up_");
        let created = repo
            .create(
                Username::new(&name).unwrap(),
                Email::new(&format!("{name}@example.com")).unwrap(),
            )
            .await
            .unwrap();

        let renamed = unique("up2_");
        let updated = repo
            .update(created.id, Some(Username::new(&renamed).unwrap()), None)
            .await
            .unwrap()
            .expect("user missing");

        assert_eq!(updated.username, renamed);
        // email untouched by the partial update
        assert_eq!(updated.email, created.email);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn absent_rows_are_not_errors() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        assert!(repo.get(i64::MAX).await.unwrap().is_none());
        assert!(repo
            .update(i64::MAX, Some(Username::new("ghostly").unwrap()), None)
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(i64::MAX).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_username_is_unique_violation() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let name = unique("dup_");
        repo.create(
            Username::new(&name).unwrap(),
            Email::new(&format!("{name}@example.com")).unwrap(),
        )
        .await
        .unwrap();

        let err = repo
            .create(
                Username::new(&name).unwrap(),
                Email::new(&format!("{name}.other@example.com")).unwrap(),
            )
            .await
            .unwrap_err();

        assert!(err.is_unique_violation());
    }
}
