//! Post endpoints
//!
//! Site-wide queries live under /api/v1/posts; everything that writes goes
//! through the user-scoped /api/v1/users/{user_id}/posts tree, where the
//! owner id participates in every lookup.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Post, PostFilter, PostRepo, PostWithComments};
use crate::http::error::ApiError;
use crate::http::extractors::BaseUrl;
use crate::models::{
    collection_links, pagination, post_links, Pagination, PostContent, PostLinks, PostSortField,
    PostTitle, SortOrder,
};
use crate::state::AppState;

use super::{positive_id, ItemEnvelope, ListEnvelope, PageMeta};

/// List query parameters for post collections. `title`/`content` carry
/// substring filters on the unscoped listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
    title: Option<String>,
    content: Option<String>,
}

#[derive(Debug)]
struct ListQuery {
    page: Pagination,
    sort: PostSortField,
    order: SortOrder,
    filter: PostFilter,
}

impl ListParams {
    fn validate(self) -> Result<ListQuery, ApiError> {
        let mut errors = Vec::new();

        let page = pagination::parse_page(self.page.as_deref()).unwrap_or_else(|e| {
            errors.push(e);
            1
        });
        let limit = pagination::parse_limit(self.limit.as_deref()).unwrap_or_else(|e| {
            errors.push(e);
            1
        });
        let sort = PostSortField::parse(self.sort_by.as_deref()).unwrap_or_else(|e| {
            errors.push(e);
            PostSortField::default()
        });
        let order = SortOrder::parse(self.order.as_deref()).unwrap_or_else(|e| {
            errors.push(e);
            SortOrder::default()
        });

        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(ListQuery {
            page: Pagination::new(page, limit),
            sort,
            order,
            filter: PostFilter {
                title: self.title,
                content: self.content,
            },
        })
    }
}

/// Limit-only parameters for the latest/most-commented rankings
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    limit: Option<String>,
}

/// Create post request body
#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Update post request body; absent fields are left unchanged
#[derive(Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Post payload with hyperlinks
#[derive(Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(rename = "_links")]
    pub links: PostLinks,
}

impl PostResponse {
    fn new(post: Post, base: &BaseUrl) -> Self {
        Self {
            links: post_links(base.as_str(), post.user_id, post.id),
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

/// Post payload with its comment count
#[derive(Serialize)]
pub struct CommentedPostResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comment_count: i64,
}

impl CommentedPostResponse {
    fn new(post: PostWithComments, base: &BaseUrl) -> Self {
        let PostWithComments {
            id,
            user_id,
            title,
            content,
            created_at,
            updated_at,
            comment_count,
        } = post;
        Self {
            post: PostResponse::new(
                Post {
                    id,
                    user_id,
                    title,
                    content,
                    created_at,
                    updated_at,
                },
                base,
            ),
            comment_count,
        }
    }
}

fn parse_update(req: UpdatePostRequest) -> Result<(Option<PostTitle>, Option<PostContent>), ApiError> {
    let mut errors = Vec::new();
    let title = req
        .title
        .as_deref()
        .and_then(|raw| PostTitle::new(raw).map_err(|e| errors.push(e)).ok());
    let content = req
        .content
        .as_deref()
        .and_then(|raw| PostContent::new(raw).map_err(|e| errors.push(e)).ok());

    if !errors.is_empty() {
        return Err(errors.into());
    }
    Ok((title, content))
}

/// GET /api/v1/posts - site-wide listing with optional substring search
async fn list_posts(
    State(state): State<AppState>,
    base: BaseUrl,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope<PostResponse>>, ApiError> {
    let query = params.validate()?;
    let result = PostRepo::new(state.pool())
        .list(&query.filter, query.page, query.sort, query.order)
        .await?;

    let pagination = PageMeta::of(&result);
    let links = collection_links(
        base.as_str(),
        "/api/v1/posts",
        result.page,
        result.limit,
        result.total_pages(),
    );
    let data = result
        .items
        .into_iter()
        .map(|p| PostResponse::new(p, &base))
        .collect();

    Ok(Json(ListEnvelope {
        data,
        pagination,
        links,
    }))
}

/// GET /api/v1/posts/latest - most recent posts
async fn latest_posts(
    State(state): State<AppState>,
    base: BaseUrl,
    Query(params): Query<LimitParams>,
) -> Result<Json<ItemEnvelope<Vec<PostResponse>>>, ApiError> {
    let limit = pagination::parse_limit(params.limit.as_deref())?;
    let posts = PostRepo::new(state.pool()).latest(limit).await?;

    Ok(Json(ItemEnvelope {
        data: posts
            .into_iter()
            .map(|p| PostResponse::new(p, &base))
            .collect(),
    }))
}

/// GET /api/v1/posts/most-commented - ranked by comment volume
async fn most_commented_posts(
    State(state): State<AppState>,
    base: BaseUrl,
    Query(params): Query<LimitParams>,
) -> Result<Json<ItemEnvelope<Vec<CommentedPostResponse>>>, ApiError> {
    let limit = pagination::parse_limit(params.limit.as_deref())?;
    let posts = PostRepo::new(state.pool()).most_commented(limit).await?;

    Ok(Json(ItemEnvelope {
        data: posts
            .into_iter()
            .map(|p| CommentedPostResponse::new(p, &base))
            .collect(),
    }))
}

/// GET /api/v1/posts/{id} - 404 if absent
async fn get_post(
    State(state): State<AppState>,
    base: BaseUrl,
    Path(id): Path<i64>,
) -> Result<Json<ItemEnvelope<PostResponse>>, ApiError> {
    let id = positive_id("id", id)?;
    let post = PostRepo::new(state.pool())
        .get(id)
        .await?
        .ok_or(ApiError::not_found("Post"))?;

    Ok(Json(ItemEnvelope {
        data: PostResponse::new(post, &base),
    }))
}

/// GET /api/v1/users/{user_id}/posts - one user's posts, paginated
async fn list_user_posts(
    State(state): State<AppState>,
    base: BaseUrl,
    Path(user_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope<PostResponse>>, ApiError> {
    let user_id = positive_id("user_id", user_id)?;
    let query = params.validate()?;
    let result = PostRepo::new(state.pool())
        .list_for_user(user_id, query.page, query.sort, query.order)
        .await?;

    let pagination = PageMeta::of(&result);
    let links = collection_links(
        base.as_str(),
        &format!("/api/v1/users/{user_id}/posts"),
        result.page,
        result.limit,
        result.total_pages(),
    );
    let data = result
        .items
        .into_iter()
        .map(|p| PostResponse::new(p, &base))
        .collect();

    Ok(Json(ListEnvelope {
        data,
        pagination,
        links,
    }))
}

/// GET /api/v1/users/{user_id}/posts/{id} - 404 unless owned by user_id
async fn get_user_post(
    State(state): State<AppState>,
    base: BaseUrl,
    Path((user_id, id)): Path<(i64, i64)>,
) -> Result<Json<ItemEnvelope<PostResponse>>, ApiError> {
    let user_id = positive_id("user_id", user_id)?;
    let id = positive_id("id", id)?;
    let post = PostRepo::new(state.pool())
        .get_for_user(id, user_id)
        .await?
        .ok_or(ApiError::not_found("Post"))?;

    Ok(Json(ItemEnvelope {
        data: PostResponse::new(post, &base),
    }))
}

/// POST /api/v1/users/{user_id}/posts - create, 201 on success
async fn create_user_post(
    State(state): State<AppState>,
    base: BaseUrl,
    Path(user_id): Path<i64>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<ItemEnvelope<PostResponse>>), ApiError> {
    let user_id = positive_id("user_id", user_id)?;

    let mut errors = Vec::new();
    let title = PostTitle::new(&req.title).map_err(|e| errors.push(e)).ok();
    let content = PostContent::new(&req.content).map_err(|e| errors.push(e)).ok();

    let (Some(title), Some(content)) = (title, content) else {
        return Err(errors.into());
    };

    let post = PostRepo::new(state.pool())
        .create_for_user(user_id, title, content)
        .await?
        .ok_or(ApiError::not_found("User"))?;

    Ok((
        StatusCode::CREATED,
        Json(ItemEnvelope {
            data: PostResponse::new(post, &base),
        }),
    ))
}

/// PUT /api/v1/users/{user_id}/posts/{id} - partial update
async fn update_user_post(
    State(state): State<AppState>,
    base: BaseUrl,
    Path((user_id, id)): Path<(i64, i64)>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<ItemEnvelope<PostResponse>>, ApiError> {
    let user_id = positive_id("user_id", user_id)?;
    let id = positive_id("id", id)?;
    let (title, content) = parse_update(req)?;

    let post = PostRepo::new(state.pool())
        .update_for_user(id, user_id, title, content)
        .await?
        .ok_or(ApiError::not_found("Post"))?;

    Ok(Json(ItemEnvelope {
        data: PostResponse::new(post, &base),
    }))
}

/// DELETE /api/v1/users/{user_id}/posts/{id} - 204 on success
async fn delete_user_post(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let user_id = positive_id("user_id", user_id)?;
    let id = positive_id("id", id)?;
    let deleted = PostRepo::new(state.pool())
        .delete_for_user(id, user_id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Post"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Post routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/posts", get(list_posts))
        .route("/api/v1/posts/latest", get(latest_posts))
        .route("/api/v1/posts/most-commented", get(most_commented_posts))
        .route("/api/v1/posts/{id}", get(get_post))
        .route(
            "/api/v1/users/{user_id}/posts",
            get(list_user_posts).post(create_user_post),
        )
        .route(
            "/api/v1/users/{user_id}/posts/{id}",
            get(get_user_post)
                .put(update_user_post)
                .delete(delete_user_post),
        )
}
