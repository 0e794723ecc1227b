//! User endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::BaseUrl;
use crate::models::{
    collection_links, pagination, user_links, Email, Pagination, SortOrder, UserLinks,
    UserSortField, Username,
};
use crate::state::AppState;

use super::{positive_id, ItemEnvelope, ListEnvelope, PageMeta};

/// List query parameters as they arrive on the wire. Parsed leniently here
/// so failures come back as structured field errors rather than a bare
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
}

#[derive(Debug)]
struct ListQuery {
    page: Pagination,
    sort: UserSortField,
    order: SortOrder,
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
        let sort = UserSortField::parse(self.sort_by.as_deref()).unwrap_or_else(|e| {
            errors.push(e);
            UserSortField::default()
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
        })
    }
}

/// Create user request body
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

/// Update user request body; absent fields are left unchanged
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// User payload with hyperlinks
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(rename = "_links")]
    pub links: UserLinks,
}

impl UserResponse {
    fn new(user: User, base: &BaseUrl) -> Self {
        Self {
            links: user_links(base.as_str(), user.id),
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// GET /api/v1/users - list users, paginated
async fn list_users(
    State(state): State<AppState>,
    base: BaseUrl,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope<UserResponse>>, ApiError> {
    let query = params.validate()?;
    let result = UserRepo::new(state.pool())
        .list(query.page, query.sort, query.order)
        .await?;

    let pagination = PageMeta::of(&result);
    let links = collection_links(
        base.as_str(),
        "/api/v1/users",
        result.page,
        result.limit,
        result.total_pages(),
    );
    let data = result
        .items
        .into_iter()
        .map(|u| UserResponse::new(u, &base))
        .collect();

    Ok(Json(ListEnvelope {
        data,
        pagination,
        links,
    }))
}

/// GET /api/v1/users/{id} - 404 if absent
async fn get_user(
    State(state): State<AppState>,
    base: BaseUrl,
    Path(id): Path<i64>,
) -> Result<Json<ItemEnvelope<UserResponse>>, ApiError> {
    let id = positive_id("id", id)?;
    let user = UserRepo::new(state.pool())
        .get(id)
        .await?
        .ok_or(ApiError::not_found("User"))?;

    Ok(Json(ItemEnvelope {
        data: UserResponse::new(user, &base),
    }))
}

/// POST /api/v1/users - create, 201 on success
async fn create_user(
    State(state): State<AppState>,
    base: BaseUrl,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ItemEnvelope<UserResponse>>), ApiError> {
    let mut errors = Vec::new();
    let username = Username::new(&req.username).map_err(|e| errors.push(e)).ok();
    let email = Email::new(&req.email).map_err(|e| errors.push(e)).ok();

    let (Some(username), Some(email)) = (username, email) else {
        return Err(errors.into());
    };

    let user = UserRepo::new(state.pool()).create(username, email).await?;

    Ok((
        StatusCode::CREATED,
        Json(ItemEnvelope {
            data: UserResponse::new(user, &base),
        }),
    ))
}

/// PUT /api/v1/users/{id} - partial update
async fn update_user(
    State(state): State<AppState>,
    base: BaseUrl,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ItemEnvelope<UserResponse>>, ApiError> {
    let id = positive_id("id", id)?;

    let mut errors = Vec::new();
    let username = req
        .username
        .as_deref()
        .and_then(|raw| Username::new(raw).map_err(|e| errors.push(e)).ok());
    let email = req
        .email
        .as_deref()
        .and_then(|raw| Email::new(raw).map_err(|e| errors.push(e)).ok());

    if !errors.is_empty() {
        return Err(errors.into());
    }

    let user = UserRepo::new(state.pool())
        .update(id, username, email)
        .await?
        .ok_or(ApiError::not_found("User"))?;

    Ok(Json(ItemEnvelope {
        data: UserResponse::new(user, &base),
    }))
}

/// DELETE /api/v1/users/{id} - 204 on success
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let id = positive_id("id", id)?;
    let deleted = UserRepo::new(state.pool()).delete(id).await?;

    if !deleted {
        return Err(ApiError::not_found("User"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// User routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", get(list_users).post(create_user))
        .route(
            "/api/v1/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
