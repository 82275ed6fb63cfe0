use axum::Router;
use axum::routing::{get, put};

use crate::presentation::AppState;
use crate::presentation::handlers::comments::{
    create_comment, delete_comment, list_comments, update_comment,
};

/// Mounted next to the post routes, so the post segment is `{id}` here too.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/comments", get(list_comments).post(create_comment))
        .route(
            "/{id}/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
}
