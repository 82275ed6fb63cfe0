use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::MessageDto;
use crate::domain::comment::{Comment, CommentRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::{AppResult, ErrorBody};
use crate::presentation::extract::{ApiPath, ValidatedJson, not_blank};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CommentPayloadDto {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "author is required"),
        length(max = 64, message = "author must be at most 64 chars")
    )]
    pub(crate) author: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "content is required"))]
    pub(crate) content: String,
}

impl From<CommentPayloadDto> for CommentRequest {
    fn from(dto: CommentPayloadDto) -> Self {
        Self {
            author: dto.author,
            content: dto.content,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author: String,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author: comment.author,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Comments of the post", body = Vec<CommentDto>),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn list_comments(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<Vec<CommentDto>>)> {
    let comments = state.comment_service.list_comments(post_id).await?;

    Ok((
        StatusCode::OK,
        Json(comments.into_iter().map(CommentDto::from).collect()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = CommentPayloadDto,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn create_comment(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i64>,
    ValidatedJson(dto): ValidatedJson<CommentPayloadDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    let comment = state
        .comment_service
        .create_comment(post_id, dto.into())
        .await?;

    Ok((StatusCode::CREATED, Json(CommentDto::from(comment))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    request_body = CommentPayloadDto,
    responses(
        (status = 200, description = "Comment replaced", body = CommentDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Comment not found under this post", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn update_comment(
    State(state): State<AppState>,
    ApiPath((post_id, comment_id)): ApiPath<(i64, i64)>,
    ValidatedJson(dto): ValidatedJson<CommentPayloadDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    let comment = state
        .comment_service
        .update_comment(post_id, comment_id, dto.into())
        .await?;

    Ok((StatusCode::OK, Json(CommentDto::from(comment))))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment deleted (also when it did not exist)", body = MessageDto),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    ApiPath((post_id, comment_id)): ApiPath<(i64, i64)>,
) -> AppResult<(StatusCode, Json<MessageDto>)> {
    state
        .comment_service
        .delete_comment(post_id, comment_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("comment deleted"))))
}
