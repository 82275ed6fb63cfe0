use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::MessageDto;
use super::categories::CategoryDto;
use crate::application::blog_service::ListPostsResult;
use crate::domain::post::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Post, PostRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::{AppResult, ErrorBody};
use crate::presentation::extract::{ApiPath, ValidatedJson, ValidatedQuery, not_blank};

/// Body of both `POST /api/posts` and `PUT /api/posts/{id}`. Missing text
/// fields deserialize as empty strings so they are reported as violations.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PostPayloadDto {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "title is required"),
        length(max = 255, message = "title must be at most 255 chars")
    )]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "content is required"))]
    pub(crate) content: String,
    #[serde(default)]
    #[validate(length(max = 512, message = "image path is too long"))]
    pub(crate) image: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "category_id must be > 0"))]
    pub(crate) category_id: Option<i64>,
}

impl From<PostPayloadDto> for PostRequest {
    fn from(dto: PostPayloadDto) -> Self {
        Self {
            title: dto.title,
            content: dto.content,
            image: dto.image,
            category_id: dto.category_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PaginationQuery {
    /// Page number, starting at 1.
    #[validate(range(min = 1))]
    pub(crate) page: Option<u32>,
    /// Items per page (1..=100), 5 by default.
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image: Option<String>,
    pub(crate) category: Option<CategoryDto>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListPostsResponseDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) page: u32,
    pub(crate) limit: u32,
    pub(crate) total: i64,
    pub(crate) total_pages: u32,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            image: post.image,
            category: post.category.map(CategoryDto::from),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<ListPostsResult> for ListPostsResponseDto {
    fn from(result: ListPostsResult) -> Self {
        let total_pages = result.total_pages();
        Self {
            posts: result.posts.into_iter().map(PostDto::from).collect(),
            page: result.page,
            limit: result.page_size,
            total: result.total,
            total_pages,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of posts in creation order", body = ListPostsResponseDto),
        (status = 400, description = "Invalid pagination", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> AppResult<(StatusCode, Json<ListPostsResponseDto>)> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);

    let result = state.blog_service.list_posts(page, limit).await?;

    Ok((StatusCode::OK, Json(ListPostsResponseDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let post = state.blog_service.get_post(id).await?;

    Ok((StatusCode::OK, Json(PostDto::from(post))))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body = PostPayloadDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<PostPayloadDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let post = state.blog_service.create_post(dto.into()).await?;

    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = PostPayloadDto,
    responses(
        (status = 200, description = "Post replaced", body = PostDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Post or category not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(dto): ValidatedJson<PostPayloadDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let post = state.blog_service.update_post(id, dto.into()).await?;

    Ok((StatusCode::OK, Json(PostDto::from(post))))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted (also when it did not exist)", body = MessageDto),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<MessageDto>)> {
    state.blog_service.delete_post(id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("post deleted"))))
}
