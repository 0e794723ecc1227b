//! Post repository
//!
//! Two query families: unscoped (site-wide listing, search, rankings) and
//! user-scoped. Scoped queries filter on `user_id` as well, so a post owned
//! by a different user is indistinguishable from a missing one.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{Paginated, Pagination, PostContent, PostSortField, PostTitle, SortOrder};

use super::DbError;

/// Post record from database
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post with its comment count, for the most-commented ranking
#[derive(Debug, Clone, FromRow)]
pub struct PostWithComments {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comment_count: i64,
}

/// Optional substring filters for the unscoped listing
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostFilter {
    fn title_pattern(&self) -> Option<String> {
        self.title.as_deref().map(contains_pattern)
    }

    fn content_pattern(&self) -> Option<String> {
        self.content.as_deref().map(contains_pattern)
    }
}

/// Escape ILIKE metacharacters so user input always matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(raw: &str) -> String {
    format!("%{}%", escape_like(raw))
}

const POST_COLUMNS: &str = "id, user_id, title, content, created_at, updated_at";

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List posts site-wide, optionally narrowed by title/content substring.
    pub async fn list(
        &self,
        filter: &PostFilter,
        page: Pagination,
        sort: PostSortField,
        order: SortOrder,
    ) -> Result<Paginated<Post>, DbError> {
        let title = filter.title_pattern();
        let content = filter.content_pattern();

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM posts
            WHERE ($1::TEXT IS NULL OR title ILIKE $1 ESCAPE '\')
              AND ($2::TEXT IS NULL OR content ILIKE $2 ESCAPE '\')
            "#,
        )
        .bind(title.as_deref())
        .bind(content.as_deref())
        .fetch_one(self.pool)
        .await?;

        // Safe to interpolate: sort column and direction come from
        // allow-list enums, never from raw user input.
        let query = format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE ($1::TEXT IS NULL OR title ILIKE $1 ESCAPE '\')
              AND ($2::TEXT IS NULL OR content ILIKE $2 ESCAPE '\')
            ORDER BY {} {}
            LIMIT $3 OFFSET $4
            "#,
            sort.as_str(),
            order.as_str()
        );

        let items = sqlx::query_as::<_, Post>(&query)
            .bind(title.as_deref())
            .bind(content.as_deref())
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

    /// Get a single post by id regardless of owner.
    pub async fn get(&self, id: i64) -> Result<Option<Post>, DbError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Most recent posts, newest first. Ties break on id for stable output.
    pub async fn latest(&self, limit: u32) -> Result<Vec<Post>, DbError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Posts ranked by comment volume, descending.
    pub async fn most_commented(&self, limit: u32) -> Result<Vec<PostWithComments>, DbError> {
        let posts = sqlx::query_as::<_, PostWithComments>(
            r#"
            SELECT p.id, p.user_id, p.title, p.content, p.created_at, p.updated_at,
                   COUNT(c.id) AS comment_count
            FROM posts p
            LEFT JOIN comments c ON c.post_id = p.id
            GROUP BY p.id
            ORDER BY comment_count DESC, p.id ASC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// List one user's posts with the total count for that user.
    pub async fn list_for_user(
        &self,
        user_id: i64,
        page: Pagination,
        sort: PostSortField,
        order: SortOrder,
    ) -> Result<Paginated<Post>, DbError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1 \
             ORDER BY {} {} LIMIT $2 OFFSET $3",
            sort.as_str(),
            order.as_str()
        );

        let items = sqlx::query_as::<_, Post>(&query)
            .bind(user_id)
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

    /// Get a post only if it belongs to the given user.
    pub async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<Post>, DbError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Create a post for a user. Returns `None` when the user does not
    /// exist, so the handler can report not-found instead of surfacing a
    /// foreign-key failure.
    pub async fn create_for_user(
        &self,
        user_id: i64,
        title: PostTitle,
        content: PostContent,
    ) -> Result<Option<Post>, DbError> {
        let user_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        if !user_exists.0 {
            return Ok(None);
        }

        let post = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (user_id, title, content) VALUES ($1, $2, $3) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(user_id)
        .bind(title.as_str())
        .bind(content.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(Some(post))
    }

    /// Partial update scoped by owner. Only supplied fields change;
    /// `updated_at` always refreshes. `None` if no row matched both ids.
    pub async fn update_for_user(
        &self,
        id: i64,
        user_id: i64,
        title: Option<PostTitle>,
        content: Option<PostContent>,
    ) -> Result<Option<Post>, DbError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(title.as_ref().map(PostTitle::as_str))
        .bind(content.as_ref().map(PostContent::as_str))
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Delete a post scoped by owner. True if a row was removed.
    pub async fn delete_for_user(&self, id: i64, user_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
