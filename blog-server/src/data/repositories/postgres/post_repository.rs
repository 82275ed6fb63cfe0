use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::FOREIGN_KEY_VIOLATION;
use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Post joined with its category; the `category_*` columns are all NULL
/// when the post has no category.
#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_id: Option<i64>,
    category_name: Option<String>,
    category_created_at: Option<DateTime<Utc>>,
    category_updated_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH inserted AS (
                INSERT INTO posts (title, content, image, category_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title, content, image, category_id, created_at, updated_at
            )
            SELECT
                p.id,
                p.title,
                p.content,
                p.image,
                p.created_at,
                p.updated_at,
                c.id AS category_id,
                c.name AS category_name,
                c.created_at AS category_created_at,
                c.updated_at AS category_updated_at
            FROM inserted p
            LEFT JOIN categories c ON c.id = p.category_id
            "#,
        )
        .bind(input.title)
        .bind(input.content)
        .bind(input.image)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p.id,
                p.title,
                p.content,
                p.image,
                p.created_at,
                p.updated_at,
                c.id AS category_id,
                c.name AS category_name,
                c.created_at AS category_created_at,
                c.updated_at AS category_updated_at
            FROM posts p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH updated AS (
                UPDATE posts
                SET title = $2,
                    content = $3,
                    image = $4,
                    category_id = $5,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING id, title, content, image, category_id, created_at, updated_at
            )
            SELECT
                p.id,
                p.title,
                p.content,
                p.image,
                p.created_at,
                p.updated_at,
                c.id AS category_id,
                c.name AS category_name,
                c.created_at AS category_created_at,
                c.updated_at AS category_updated_at
            FROM updated p
            LEFT JOIN categories c ON c.id = p.category_id
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.image)
        .bind(patch.category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, pagination: Pagination) -> Result<Vec<Post>, DomainError> {
        let limit = i64::from(pagination.page_size);
        let offset = i64::try_from(pagination.offset())
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p.id,
                p.title,
                p.content,
                p.image,
                p.created_at,
                p.updated_at,
                c.id AS category_id,
                c.name AS category_name,
                c.created_at AS category_created_at,
                c.updated_at AS category_updated_at
            FROM posts p
            LEFT JOIN categories c ON c.id = p.category_id
            ORDER BY p.created_at ASC, p.id ASC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn total_posts(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    let category = match (
        row.category_id,
        row.category_name,
        row.category_created_at,
        row.category_updated_at,
    ) {
        (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(Category {
            id,
            name,
            created_at,
            updated_at,
        }),
        _ => None,
    };

    Post::new(
        row.id,
        row.title,
        row.content,
        row.image,
        category,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    {
        return DomainError::NotFound("category".to_string());
    }
    DomainError::Persistence(err.to_string())
}
