use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentRequest};
use crate::domain::error::DomainError;

pub(crate) struct CommentService<C: CommentRepository, P: PostRepository> {
    comments: C,
    posts: P,
}

impl<C: CommentRepository, P: PostRepository> CommentService<C, P> {
    pub(crate) fn new(comments: C, posts: P) -> Self {
        Self { comments, posts }
    }

    pub(crate) async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        self.ensure_post(post_id).await?;
        self.comments.list_comments(post_id).await
    }

    pub(crate) async fn create_comment(
        &self,
        post_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;
        self.ensure_post(post_id).await?;

        self.comments
            .create_comment(NewComment {
                post_id,
                author: req.author,
                content: req.content,
            })
            .await
    }

    pub(crate) async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;
        let patch = CommentPatch {
            author: req.author,
            content: req.content,
        };

        self.comments
            .update_comment(post_id, comment_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment {comment_id}")))
    }

    pub(crate) async fn delete_comment(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        self.comments.delete_comment(post_id, comment_id).await?;
        Ok(())
    }

    async fn ensure_post(&self, post_id: i64) -> Result<(), DomainError> {
        match self.posts.get_post(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("post {post_id}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CommentService;
    use crate::data::post_repository::{NewPost, PostRepository};
    use crate::data::repositories::memory::MemoryStore;
    use crate::domain::comment::CommentRequest;
    use crate::domain::error::DomainError;

    fn request(author: &str, content: &str) -> CommentRequest {
        CommentRequest {
            author: author.to_string(),
            content: content.to_string(),
        }
    }

    async fn seeded_post(store: &MemoryStore) -> i64 {
        store
            .create_post(NewPost {
                title: "title".to_string(),
                content: "content".to_string(),
                image: None,
                category_id: None,
            })
            .await
            .expect("post must be created")
            .id
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found() {
        let store = MemoryStore::new();
        let service = CommentService::new(store.clone(), store);

        let err = service
            .create_comment(404, request("ana", "hello"))
            .await
            .expect_err("missing post must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn comments_are_scoped_to_their_post() {
        let store = MemoryStore::new();
        let first = seeded_post(&store).await;
        let second = seeded_post(&store).await;
        let service = CommentService::new(store.clone(), store);

        let comment = service
            .create_comment(first, request("ana", "hello"))
            .await
            .expect("comment must be created");

        assert_eq!(service.list_comments(first).await.expect("list").len(), 1);
        assert!(service.list_comments(second).await.expect("list").is_empty());

        let err = service
            .update_comment(second, comment.id, request("bob", "moved"))
            .await
            .expect_err("comment of another post must not be updated");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_comment_replaces_fields() {
        let store = MemoryStore::new();
        let post_id = seeded_post(&store).await;
        let service = CommentService::new(store.clone(), store);

        let comment = service
            .create_comment(post_id, request("ana", "hello"))
            .await
            .expect("comment must be created");
        let updated = service
            .update_comment(post_id, comment.id, request(" ana ", " edited "))
            .await
            .expect("update must succeed");

        assert_eq!(updated.id, comment.id);
        assert_eq!(updated.content, "edited");
    }
}
