use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::data::category_repository::{CategoryRepository, NewCategory};
use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::user::User;

/// Process-local store mirroring the PostgreSQL schema constraints:
/// unique category names, unique usernames/emails, post -> category and
/// comment -> post references, comments removed together with their post.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    posts: BTreeMap<i64, PostRecord>,
    comments: BTreeMap<i64, Comment>,
    users: BTreeMap<i64, UserCredentials>,
    sequences: Sequences,
}

#[derive(Debug, Default)]
struct Sequences {
    category: i64,
    post: i64,
    comment: i64,
    user: i64,
}

fn next_id(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

#[derive(Debug, Clone)]
struct PostRecord {
    id: i64,
    title: String,
    content: String,
    image: Option<String>,
    category_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Tables {
    fn ensure_category(&self, category_id: Option<i64>) -> Result<(), DomainError> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => {
                Err(DomainError::NotFound("category".to_string()))
            }
            _ => Ok(()),
        }
    }

    fn resolve(&self, record: &PostRecord) -> Result<Post, DomainError> {
        let category = record
            .category_id
            .and_then(|id| self.categories.get(&id))
            .cloned();

        Post::new(
            record.id,
            record.title.clone(),
            record.content.clone(),
            record.image.clone(),
            category,
            record.created_at,
            record.updated_at,
        )
        .map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().await;
        tables.ensure_category(input.category_id)?;

        let now = Utc::now();
        let record = PostRecord {
            id: next_id(&mut tables.sequences.post),
            title: input.title,
            content: input.content,
            image: input.image,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        };
        let post = tables.resolve(&record)?;
        tables.posts.insert(record.id, record);
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .get(&id)
            .map(|record| tables.resolve(record))
            .transpose()
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Ok(None);
        }
        tables.ensure_category(patch.category_id)?;

        let Some(record) = tables.posts.get_mut(&id) else {
            return Ok(None);
        };
        record.title = patch.title;
        record.content = patch.content;
        record.image = patch.image;
        record.category_id = patch.category_id;
        record.updated_at = Utc::now().max(record.created_at);

        let record = record.clone();
        tables.resolve(&record).map(Some)
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let removed = tables.posts.remove(&id).is_some();
        if removed {
            tables.comments.retain(|_, comment| comment.post_id != id);
        }
        Ok(removed)
    }

    async fn list_posts(&self, pagination: Pagination) -> Result<Vec<Post>, DomainError> {
        let tables = self.tables.read().await;
        let mut records: Vec<&PostRecord> = tables.posts.values().collect();
        records.sort_by_key(|record| (record.created_at, record.id));

        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        records
            .into_iter()
            .skip(offset)
            .take(pagination.page_size as usize)
            .map(|record| tables.resolve(record))
            .collect()
    }

    async fn total_posts(&self) -> Result<i64, DomainError> {
        let tables = self.tables.read().await;
        i64::try_from(tables.posts.len()).map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create_category(&self, input: NewCategory) -> Result<Category, DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .categories
            .values()
            .any(|category| category.name == input.name)
        {
            return Err(DomainError::AlreadyExists("category".to_string()));
        }

        let now = Utc::now();
        let category = Category {
            id: next_id(&mut tables.sequences.category),
            name: input.name,
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&input.post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }

        let now = Utc::now();
        let comment = Comment {
            id: next_id(&mut tables.sequences.comment),
            post_id: input.post_id,
            author: input.author,
            content: input.content,
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| (comment.created_at, comment.id));
        Ok(comments)
    }

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables
            .comments
            .get_mut(&comment_id)
            .filter(|comment| comment.post_id == post_id)
        else {
            return Ok(None);
        };

        comment.author = patch.author;
        comment.content = patch.content;
        comment.updated_at = Utc::now().max(comment.created_at);
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .comments
            .get(&comment_id)
            .is_some_and(|comment| comment.post_id == post_id);
        if owned {
            tables.comments.remove(&comment_id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        for creds in tables.users.values() {
            if creds.user.username == input.username {
                return Err(DomainError::AlreadyExists("username".to_string()));
            }
            if creds.user.email == input.email {
                return Err(DomainError::AlreadyExists("email".to_string()));
            }
        }

        let id = next_id(&mut tables.sequences.user);
        let user = User::new(id, input.username, input.email, Utc::now())
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        tables.users.insert(
            id,
            UserCredentials {
                user: user.clone(),
                password_hash: input.password_hash,
            },
        );
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|creds| creds.user.username == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::data::category_repository::{CategoryRepository, NewCategory};
    use crate::data::comment_repository::{CommentRepository, NewComment};
    use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
    use crate::domain::error::DomainError;

    fn new_post(title: &str, category_id: Option<i64>) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "content".to_string(),
            image: None,
            category_id,
        }
    }

    #[tokio::test]
    async fn list_posts_pages_in_creation_order() {
        let store = MemoryStore::new();
        for n in 1..=7 {
            store
                .create_post(new_post(&format!("post {n}"), None))
                .await
                .expect("create must succeed");
        }

        let page = store
            .list_posts(Pagination {
                page: 2,
                page_size: 5,
            })
            .await
            .expect("list must succeed");

        let titles: Vec<&str> = page.iter().map(|post| post.title.as_str()).collect();
        assert_eq!(titles, vec!["post 6", "post 7"]);
        assert_eq!(store.total_posts().await.expect("count"), 7);
    }

    #[tokio::test]
    async fn create_post_resolves_category() {
        let store = MemoryStore::new();
        let category = store
            .create_category(NewCategory {
                name: "rust".to_string(),
            })
            .await
            .expect("category must be created");

        let post = store
            .create_post(new_post("typed", Some(category.id)))
            .await
            .expect("post must be created");

        assert_eq!(post.category, Some(category));
    }

    #[tokio::test]
    async fn create_post_with_unknown_category_is_not_found() {
        let store = MemoryStore::new();

        let err = store
            .create_post(new_post("orphan", Some(99)))
            .await
            .expect_err("unknown category must fail");
        assert!(matches!(err, DomainError::NotFound(resource) if resource == "category"));
    }

    #[tokio::test]
    async fn update_missing_post_returns_none() {
        let store = MemoryStore::new();
        let patch = PostPatch {
            title: "t".to_string(),
            content: "c".to_string(),
            image: None,
            category_id: None,
        };

        let updated = store.update_post(5, patch).await.expect("update must not fail");
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn duplicate_category_name_is_rejected() {
        let store = MemoryStore::new();
        let input = NewCategory {
            name: "news".to_string(),
        };
        store
            .create_category(input.clone())
            .await
            .expect("first insert must succeed");

        let err = store
            .create_category(input)
            .await
            .expect_err("duplicate must fail");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn delete_post_removes_its_comments() {
        let store = MemoryStore::new();
        let post = store
            .create_post(new_post("with comments", None))
            .await
            .expect("post must be created");
        store
            .create_comment(NewComment {
                post_id: post.id,
                author: "ana".to_string(),
                content: "first".to_string(),
            })
            .await
            .expect("comment must be created");

        assert!(store.delete_post(post.id).await.expect("delete"));
        assert!(!store.delete_post(post.id).await.expect("second delete"));
        assert!(
            store
                .list_comments(post.id)
                .await
                .expect("list comments")
                .is_empty()
        );
    }
}
