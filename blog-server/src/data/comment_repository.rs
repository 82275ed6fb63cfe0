use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) post_id: i64,
    pub(crate) author: String,
    pub(crate) content: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentPatch {
    pub(crate) author: String,
    pub(crate) content: String,
}

#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError>;
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError>;
    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError>;
    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<bool, DomainError>;
}

#[async_trait]
impl<T: CommentRepository + ?Sized> CommentRepository for Arc<T> {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        (**self).create_comment(input).await
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        (**self).list_comments(post_id).await
    }

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError> {
        (**self).update_comment(post_id, comment_id, patch).await
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<bool, DomainError> {
        (**self).delete_comment(post_id, comment_id).await
    }
}
