use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

/// Uniform error body: `{message, error?}` or `{message, errors: [...]}`.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) errors: Vec<FieldViolation>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FieldViolation {
    pub(crate) field: String,
    pub(crate) message: String,
}

impl ErrorBody {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
            errors: Vec::new(),
        }
    }

    fn with_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::message(message)
        }
    }

    fn violations(errors: Vec<FieldViolation>) -> Self {
        Self {
            errors,
            ..Self::message("validation failed")
        }
    }
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation { field, message } => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::violations(vec![FieldViolation {
                        field: field.to_string(),
                        message: message.to_string(),
                    }]),
                ),
                DomainError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, ErrorBody::message(err.to_string()))
                }
                DomainError::AlreadyExists(_) => {
                    (StatusCode::CONFLICT, ErrorBody::message(err.to_string()))
                }
                DomainError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, ErrorBody::message(err.to_string()))
                }
                DomainError::Persistence(_) | DomainError::Unexpected(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::with_error("internal server error", err.to_string()),
                ),
            },
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::violations(field_violations(&errors)),
            ),
            AppError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::with_error("malformed request", reason),
            ),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, ErrorBody::message("unauthorized"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let description = self.to_string();
        let (status, body) = self.status_and_body();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %description, "request failed");
        } else {
            debug!(status = status.as_u16(), error = %description, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

/// Sorted by field name so responses are stable regardless of hash order.
fn field_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |err| FieldViolation {
                field: field.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
            })
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use validator::{ValidationError, ValidationErrors};

    use super::AppError;
    use crate::domain::error::DomainError;

    #[test]
    fn each_domain_kind_maps_to_one_status() {
        let cases = [
            (
                DomainError::Validation {
                    field: "title",
                    message: "must be 1..255 chars",
                },
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::NotFound("post 1".to_string()), StatusCode::NOT_FOUND),
            (DomainError::AlreadyExists("category".to_string()), StatusCode::CONFLICT),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                DomainError::Persistence("connection reset".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::Unexpected("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = AppError::from(err).status_and_body();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn server_errors_expose_raw_error_text() {
        let err = DomainError::Persistence("pool timed out".to_string());
        let (_, body) = AppError::from(err).status_and_body();

        assert_eq!(body.message, "internal server error");
        assert_eq!(
            body.error.as_deref(),
            Some("persistence error: pool timed out")
        );
    }

    #[test]
    fn validation_errors_are_listed_per_field_sorted() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "title",
            ValidationError::new("length").with_message("title must be 1..255 chars".into()),
        );
        errors.add("content", ValidationError::new("length"));

        let (status, body) = AppError::from(errors).status_and_body();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Vec<&str> = body.errors.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["content", "title"]);
        assert_eq!(body.errors[0].message, "length");
        assert_eq!(body.errors[1].message, "title must be 1..255 chars");
    }
}
