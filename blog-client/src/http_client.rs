use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{BlogClientError, BlogClientResult};
use crate::models::{AuthResponse, Category, Comment, CurrentUser, Post, PostInput, PostPage};

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CategoryRequestDto<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentRequestDto<'a> {
    author: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ListPostsQuery {
    page: u32,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct FieldViolationDto {
    field: String,
    message: String,
}

/// Тело ошибки сервера: `{message, error?, errors?}`.
#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    message: Option<String>,
    error: Option<String>,
    #[serde(default)]
    errors: Vec<FieldViolationDto>,
}

impl ErrorResponseDto {
    fn into_message(self) -> Option<String> {
        if !self.errors.is_empty() {
            let fields: Vec<String> = self
                .errors
                .into_iter()
                .map(|v| format!("{}: {}", v.field, v.message))
                .collect();
            return Some(fields.join("; "));
        }
        match (self.message, self.error) {
            (Some(message), Some(error)) => Some(format!("{message}: {error}")),
            (message, error) => message.or(error),
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API `blog-server`.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> BlogClientError {
        let status = response.status();
        let message = response
            .json::<ErrorResponseDto>()
            .await
            .ok()
            .and_then(ErrorResponseDto::into_message);
        BlogClientError::from_http_status(status, message)
    }

    async fn execute(request: RequestBuilder) -> BlogClientResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    /// универсальный helper: отправить запрос и разобрать json-ответ
    async fn fetch<TRes>(request: RequestBuilder) -> BlogClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        Self::execute(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(BlogClientError::from_reqwest)
    }

    /// Регистрирует пользователя и возвращает JWT + данные пользователя.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BlogClientResult<AuthResponse> {
        let payload = RegisterRequestDto {
            username,
            email,
            password,
        };
        Self::fetch(
            self.request(Method::POST, "/api/auth/register", None)
                .json(&payload),
        )
        .await
    }

    /// Выполняет авторизацию пользователя и возвращает JWT + данные пользователя.
    pub async fn login(&self, username: &str, password: &str) -> BlogClientResult<AuthResponse> {
        let payload = LoginRequestDto { username, password };
        Self::fetch(self.request(Method::POST, "/api/auth/login", None).json(&payload)).await
    }

    /// Возвращает пользователя, которому принадлежит токен.
    pub async fn me(&self, token: &str) -> BlogClientResult<CurrentUser> {
        Self::fetch(self.request(Method::GET, "/api/auth/me", Some(token))).await
    }

    /// Возвращает страницу постов (`page` с 1, `limit` 1..=100).
    pub async fn list_posts(
        &self,
        token: Option<&str>,
        page: u32,
        limit: u32,
    ) -> BlogClientResult<PostPage> {
        let query = ListPostsQuery { page, limit };
        Self::fetch(self.request(Method::GET, "/api/posts", token).query(&query)).await
    }

    /// Получает пост по идентификатору.
    pub async fn get_post(&self, token: Option<&str>, id: i64) -> BlogClientResult<Post> {
        Self::fetch(self.request(Method::GET, &format!("/api/posts/{id}"), token)).await
    }

    /// Создаёт пост.
    pub async fn create_post(
        &self,
        token: Option<&str>,
        input: &PostInput,
    ) -> BlogClientResult<Post> {
        Self::fetch(self.request(Method::POST, "/api/posts", token).json(input)).await
    }

    /// Полностью заменяет пост по идентификатору.
    pub async fn update_post(
        &self,
        token: Option<&str>,
        id: i64,
        input: &PostInput,
    ) -> BlogClientResult<Post> {
        Self::fetch(
            self.request(Method::PUT, &format!("/api/posts/{id}"), token)
                .json(input),
        )
        .await
    }

    /// Удаляет пост по идентификатору. Повторное удаление не считается ошибкой.
    pub async fn delete_post(&self, token: Option<&str>, id: i64) -> BlogClientResult<()> {
        Self::execute(self.request(Method::DELETE, &format!("/api/posts/{id}"), token)).await?;
        Ok(())
    }

    /// Возвращает все категории, отсортированные по названию.
    pub async fn list_categories(&self, token: Option<&str>) -> BlogClientResult<Vec<Category>> {
        Self::fetch(self.request(Method::GET, "/api/categories", token)).await
    }

    /// Создаёт категорию.
    pub async fn create_category(
        &self,
        token: Option<&str>,
        name: &str,
    ) -> BlogClientResult<Category> {
        let payload = CategoryRequestDto { name };
        Self::fetch(
            self.request(Method::POST, "/api/categories", token)
                .json(&payload),
        )
        .await
    }

    /// Возвращает комментарии поста в порядке создания.
    pub async fn list_comments(
        &self,
        token: Option<&str>,
        post_id: i64,
    ) -> BlogClientResult<Vec<Comment>> {
        Self::fetch(self.request(
            Method::GET,
            &format!("/api/posts/{post_id}/comments"),
            token,
        ))
        .await
    }

    /// Добавляет комментарий к посту.
    pub async fn create_comment(
        &self,
        token: Option<&str>,
        post_id: i64,
        author: &str,
        content: &str,
    ) -> BlogClientResult<Comment> {
        let payload = CommentRequestDto { author, content };
        Self::fetch(
            self.request(
                Method::POST,
                &format!("/api/posts/{post_id}/comments"),
                token,
            )
            .json(&payload),
        )
        .await
    }

    /// Полностью заменяет комментарий.
    pub async fn update_comment(
        &self,
        token: Option<&str>,
        post_id: i64,
        comment_id: i64,
        author: &str,
        content: &str,
    ) -> BlogClientResult<Comment> {
        let payload = CommentRequestDto { author, content };
        Self::fetch(
            self.request(
                Method::PUT,
                &format!("/api/posts/{post_id}/comments/{comment_id}"),
                token,
            )
            .json(&payload),
        )
        .await
    }

    /// Удаляет комментарий.
    pub async fn delete_comment(
        &self,
        token: Option<&str>,
        post_id: i64,
        comment_id: i64,
    ) -> BlogClientResult<()> {
        Self::execute(self.request(
            Method::DELETE,
            &format!("/api/posts/{post_id}/comments/{comment_id}"),
            token,
        ))
        .await?;
        Ok(())
    }
}
