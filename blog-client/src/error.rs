use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `blog-client`.
pub enum BlogClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (отсутствует/некорректен токен или неверные учётные данные).
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found: {0}")]
    NotFound(String),

    /// Ресурс с такими данными уже существует.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Некорректный запрос или ошибка валидации.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Внутренняя ошибка сервера.
    #[error("server error: {0}")]
    Server(String),

    /// Ошибка чтения/записи хранилища токена.
    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Результат операций `blog-client`.
pub type BlogClientResult<T> = Result<T, BlogClientError>;

impl BlogClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(message),
            reqwest::StatusCode::CONFLICT => Self::AlreadyExists(message),
            status if status.is_server_error() => Self::Server(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::BlogClientError;

    #[test]
    fn statuses_map_to_variants() {
        let msg = || Some("boom".to_string());

        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::UNAUTHORIZED, msg()),
            BlogClientError::Unauthorized
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::NOT_FOUND, msg()),
            BlogClientError::NotFound(m) if m == "boom"
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::CONFLICT, msg()),
            BlogClientError::AlreadyExists(_)
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::INTERNAL_SERVER_ERROR, msg()),
            BlogClientError::Server(_)
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::BAD_REQUEST, None),
            BlogClientError::InvalidRequest(m) if m.contains("400")
        ));
    }
}
