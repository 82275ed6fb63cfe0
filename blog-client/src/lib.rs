//! Клиентская библиотека для работы с blog-server по HTTP.
//!
//! Предоставляет:
//! - `BlogClient`: типизированный API поверх REST (`reqwest`);
//! - `BlogContext`: общее состояние клиента (посты, категории, флаг загрузки)
//!   с подпиской на изменения через `tokio::sync::watch`;
//! - `TokenStore`: хранилище JWT-токена между запусками.
//!
//! Клиент хранит JWT-токен после `register`/`login` и прикладывает его ко всем
//! последующим запросам.
#![warn(missing_docs)]

mod context;
mod error;
mod http_client;
mod models;
mod token_store;

pub use context::{BlogContext, BlogSnapshot, FIRST_PAGE_LIMIT};
pub use error::{BlogClientError, BlogClientResult};
pub use models::{AuthResponse, Category, Comment, CurrentUser, Post, PostInput, PostPage, User};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент REST API блог-сервиса.
pub struct BlogClient {
    http_client: HttpClient,
    token: Option<String>,
}

impl BlogClient {
    /// Создаёт клиент с базовым URL сервера, например `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Регистрирует пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BlogClientResult<AuthResponse> {
        let result = self.http_client.register(username, email, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Выполняет вход пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> BlogClientResult<AuthResponse> {
        let result = self.http_client.login(username, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Возвращает пользователя текущего токена.
    ///
    /// Требует установленный JWT-токен.
    pub async fn me(&self) -> BlogClientResult<CurrentUser> {
        let token = self.token.as_deref().ok_or(BlogClientError::Unauthorized)?;
        self.http_client.me(token).await
    }

    /// Возвращает страницу постов.
    pub async fn list_posts(&self, page: u32, limit: u32) -> BlogClientResult<PostPage> {
        self.http_client
            .list_posts(self.get_token(), page, limit)
            .await
    }

    /// Возвращает пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> BlogClientResult<Post> {
        self.http_client.get_post(self.get_token(), id).await
    }

    /// Создаёт новый пост.
    pub async fn create_post(&self, input: &PostInput) -> BlogClientResult<Post> {
        self.http_client.create_post(self.get_token(), input).await
    }

    /// Полностью заменяет пост: не указанные в `input` изображение и категория сбрасываются.
    pub async fn update_post(&self, id: i64, input: &PostInput) -> BlogClientResult<Post> {
        self.http_client
            .update_post(self.get_token(), id, input)
            .await
    }

    /// Удаляет пост по идентификатору.
    pub async fn delete_post(&self, id: i64) -> BlogClientResult<()> {
        self.http_client.delete_post(self.get_token(), id).await
    }

    /// Возвращает список категорий.
    pub async fn list_categories(&self) -> BlogClientResult<Vec<Category>> {
        self.http_client.list_categories(self.get_token()).await
    }

    /// Создаёт категорию.
    pub async fn create_category(&self, name: &str) -> BlogClientResult<Category> {
        self.http_client
            .create_category(self.get_token(), name)
            .await
    }

    /// Возвращает комментарии поста.
    pub async fn list_comments(&self, post_id: i64) -> BlogClientResult<Vec<Comment>> {
        self.http_client
            .list_comments(self.get_token(), post_id)
            .await
    }

    /// Добавляет комментарий к посту.
    pub async fn create_comment(
        &self,
        post_id: i64,
        author: &str,
        content: &str,
    ) -> BlogClientResult<Comment> {
        self.http_client
            .create_comment(self.get_token(), post_id, author, content)
            .await
    }

    /// Полностью заменяет комментарий.
    pub async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        author: &str,
        content: &str,
    ) -> BlogClientResult<Comment> {
        self.http_client
            .update_comment(self.get_token(), post_id, comment_id, author, content)
            .await
    }

    /// Удаляет комментарий.
    pub async fn delete_comment(&self, post_id: i64, comment_id: i64) -> BlogClientResult<()> {
        self.http_client
            .delete_comment(self.get_token(), post_id, comment_id)
            .await
    }
}
