use std::sync::Arc;

use sqlx::PgPool;

use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;

pub(crate) mod memory;
pub(crate) mod postgres;

use memory::MemoryStore;
use postgres::category_repository::PostgresCategoryRepository;
use postgres::comment_repository::PostgresCommentRepository;
use postgres::post_repository::PostgresPostRepository;
use postgres::user_repository::PostgresUserRepository;

/// One handle per persistence port, all backed by the same store.
#[derive(Clone)]
pub(crate) struct Repositories {
    pub(crate) posts: Arc<dyn PostRepository>,
    pub(crate) categories: Arc<dyn CategoryRepository>,
    pub(crate) comments: Arc<dyn CommentRepository>,
    pub(crate) users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub(crate) fn postgres(pool: PgPool) -> Self {
        Self {
            posts: Arc::new(PostgresPostRepository::new(pool.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool)),
        }
    }

    pub(crate) fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            posts: Arc::new(store.clone()),
            categories: Arc::new(store.clone()),
            comments: Arc::new(store.clone()),
            users: Arc::new(store),
        }
    }
}
