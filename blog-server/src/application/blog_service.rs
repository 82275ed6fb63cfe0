use tracing::{debug, info};

use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostRequest};

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) total: i64,
}

impl ListPostsResult {
    pub(crate) fn total_pages(&self) -> u32 {
        if self.page_size == 0 || self.total <= 0 {
            return 0;
        }
        let pages = (self.total as u64).div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

pub(crate) struct BlogService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> BlogService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_post(&self, req: PostRequest) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            content: req.content,
            image: req.image,
            category_id: req.category_id,
        };
        let post = self.repo.create_post(new_post).await?;
        info!(post_id = post.id, "post created");
        Ok(post)
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post {id}")))
    }

    /// Writes straight away; a missing post is only noticed because the
    /// update touched nothing.
    pub(crate) async fn update_post(&self, id: i64, req: PostRequest) -> Result<Post, DomainError> {
        let req = req.validate()?;
        let patch = PostPatch {
            title: req.title,
            content: req.content,
            image: req.image,
            category_id: req.category_id,
        };
        self.repo
            .update_post(id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post {id}")))
    }

    /// Idempotent: deleting an absent post is not an error.
    pub(crate) async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        let deleted = self.repo.delete_post(id).await?;
        if deleted {
            info!(post_id = id, "post deleted");
        } else {
            debug!(post_id = id, "delete of absent post ignored");
        }
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<ListPostsResult, DomainError> {
        let pagination = Pagination { page, page_size };
        let posts = self.repo.list_posts(pagination).await?;
        let total = self.repo.total_posts().await?;

        Ok(ListPostsResult {
            posts,
            page,
            page_size,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::{BlogService, ListPostsResult};
    use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
    use crate::domain::error::DomainError;
    use crate::domain::post::{Post, PostRequest};

    #[derive(Clone)]
    struct FakePostRepo {
        created_input: Arc<Mutex<Option<NewPost>>>,
        post_for_get: Arc<Mutex<Option<Post>>>,
        update_result: Arc<Mutex<Option<Post>>>,
        update_call: Arc<Mutex<Option<(i64, PostPatch)>>>,
        get_calls: Arc<Mutex<u32>>,
        delete_result: Arc<Mutex<bool>>,
        list_call: Arc<Mutex<Option<Pagination>>>,
        list_result: Arc<Mutex<Vec<Post>>>,
        total_result: Arc<Mutex<i64>>,
    }

    impl FakePostRepo {
        fn new() -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                post_for_get: Arc::new(Mutex::new(None)),
                update_result: Arc::new(Mutex::new(None)),
                update_call: Arc::new(Mutex::new(None)),
                get_calls: Arc::new(Mutex::new(0)),
                delete_result: Arc::new(Mutex::new(true)),
                list_call: Arc::new(Mutex::new(None)),
                list_result: Arc::new(Mutex::new(Vec::new())),
                total_result: Arc::new(Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            Ok(sample_post(1, &input.title, &input.content))
        }

        async fn get_post(&self, _id: i64) -> Result<Option<Post>, DomainError> {
            *self.get_calls.lock().expect("get_calls mutex poisoned") += 1;
            Ok(self
                .post_for_get
                .lock()
                .expect("post_for_get mutex poisoned")
                .clone())
        }

        async fn update_post(
            &self,
            id: i64,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            *self.update_call.lock().expect("update_call mutex poisoned") = Some((id, patch));
            Ok(self
                .update_result
                .lock()
                .expect("update_result mutex poisoned")
                .clone())
        }

        async fn delete_post(&self, _id: i64) -> Result<bool, DomainError> {
            Ok(*self
                .delete_result
                .lock()
                .expect("delete_result mutex poisoned"))
        }

        async fn list_posts(&self, pagination: Pagination) -> Result<Vec<Post>, DomainError> {
            *self.list_call.lock().expect("list_call mutex poisoned") = Some(pagination);
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .clone())
        }

        async fn total_posts(&self) -> Result<i64, DomainError> {
            Ok(*self
                .total_result
                .lock()
                .expect("total_result mutex poisoned"))
        }
    }

    #[tokio::test]
    async fn create_post_normalizes_request_before_repo_call() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone());

        let req = PostRequest {
            title: "  title  ".to_string(),
            content: "  content  ".to_string(),
            image: Some(" /uploads/a.png ".to_string()),
            category_id: Some(2),
        };

        let created = service
            .create_post(req)
            .await
            .expect("create_post must succeed");
        assert_eq!(created.title, "title");

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.title, "title");
        assert_eq!(input.content, "content");
        assert_eq!(input.image.as_deref(), Some("/uploads/a.png"));
        assert_eq!(input.category_id, Some(2));
    }

    #[tokio::test]
    async fn create_post_rejects_blank_content_without_repo_call() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone());

        let err = service
            .create_post(PostRequest {
                title: "title".to_string(),
                content: "  ".to_string(),
                image: None,
                category_id: None,
            })
            .await
            .expect_err("blank content must fail");

        assert!(matches!(err, DomainError::Validation { field: "content", .. }));
        assert!(
            repo.created_input
                .lock()
                .expect("created_input mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn get_post_returns_not_found_when_missing() {
        let service = BlogService::new(FakePostRepo::new());

        let err = service
            .get_post(42)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_post_writes_without_existence_lookup() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone());

        let err = service
            .update_post(
                7,
                PostRequest {
                    title: "  new  ".to_string(),
                    content: "body".to_string(),
                    image: None,
                    category_id: None,
                },
            )
            .await
            .expect_err("update of missing post must fail");
        assert!(matches!(err, DomainError::NotFound(_)));

        let call = repo
            .update_call
            .lock()
            .expect("update_call mutex poisoned")
            .clone()
            .expect("update call must be captured");
        assert_eq!(call.0, 7);
        assert_eq!(call.1.title, "new");
        assert_eq!(*repo.get_calls.lock().expect("get_calls mutex poisoned"), 0);
    }

    #[tokio::test]
    async fn delete_post_is_idempotent() {
        let repo = FakePostRepo::new();
        *repo
            .delete_result
            .lock()
            .expect("delete_result mutex poisoned") = false;

        let service = BlogService::new(repo);
        service
            .delete_post(7)
            .await
            .expect("deleting an absent post must succeed");
    }

    #[tokio::test]
    async fn list_posts_passes_pagination_and_total() {
        let repo = FakePostRepo::new();
        *repo.list_result.lock().expect("list_result mutex poisoned") =
            vec![sample_post(6, "a", "b")];
        *repo
            .total_result
            .lock()
            .expect("total_result mutex poisoned") = 6;

        let service = BlogService::new(repo.clone());
        let result = service
            .list_posts(2, 5)
            .await
            .expect("list_posts must succeed");

        assert_eq!(result.page, 2);
        assert_eq!(result.page_size, 5);
        assert_eq!(result.total, 6);
        assert_eq!(result.total_pages(), 2);
        assert_eq!(
            *repo.list_call.lock().expect("list_call mutex poisoned"),
            Some(Pagination {
                page: 2,
                page_size: 5
            })
        );
    }

    #[test]
    fn total_pages_of_empty_listing_is_zero() {
        let result = ListPostsResult {
            posts: Vec::new(),
            page: 1,
            page_size: 5,
            total: 0,
        };
        assert_eq!(result.total_pages(), 0);
    }

    fn sample_post(id: i64, title: &str, content: &str) -> Post {
        Post::new(
            id,
            title.to_string(),
            content.to_string(),
            None,
            None,
            Utc::now(),
            Utc::now(),
        )
        .expect("sample post must be valid")
    }
}
