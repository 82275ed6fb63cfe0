use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Дата и время создания пользователя (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Категория постов.
pub struct Category {
    /// Идентификатор категории.
    pub id: i64,
    /// Уникальное название.
    pub name: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок поста.
    pub title: String,
    /// Содержимое поста.
    pub content: String,
    /// Путь к изображению, например `/uploads/cover.png`.
    pub image: Option<String>,
    /// Категория поста (уже разрешённая сервером).
    pub category: Option<Category>,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления поста (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Идентификатор поста.
    pub post_id: i64,
    /// Имя автора.
    pub author: String,
    /// Текст комментария.
    pub content: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Личность, извлечённая сервером из JWT (`GET /api/auth/me`).
pub struct CurrentUser {
    /// Идентификатор пользователя.
    pub user_id: i64,
    /// Логин.
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Страница списка постов.
pub struct PostPage {
    /// Посты текущей страницы в порядке создания.
    pub posts: Vec<Post>,
    /// Номер страницы (с 1).
    pub page: u32,
    /// Размер страницы.
    pub limit: u32,
    /// Общее количество постов.
    pub total: i64,
    /// Количество страниц.
    pub total_pages: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Данные для создания или полной замены поста.
pub struct PostInput {
    /// Заголовок.
    pub title: String,
    /// Содержимое.
    pub content: String,
    /// Путь к изображению.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Идентификатор категории.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl PostInput {
    /// Пост без изображения и категории.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}
