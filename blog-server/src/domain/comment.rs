use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author: String,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CommentRequest {
    pub(crate) author: String,
    pub(crate) content: String,
}

impl CommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let author = self.author.trim();
        if author.is_empty() || author.chars().count() > 64 {
            return Err(DomainError::Validation {
                field: "author",
                message: "must be 1..64 chars",
            });
        }

        let content = self.content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation {
                field: "content",
                message: "must not be empty",
            });
        }

        Ok(Self {
            author: author.to_string(),
            content: content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentRequest, DomainError};

    #[test]
    fn comment_request_trims_fields() {
        let req = CommentRequest {
            author: "  ana  ".to_string(),
            content: "  nice post  ".to_string(),
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.author, "ana");
        assert_eq!(validated.content, "nice post");
    }

    #[test]
    fn comment_request_rejects_blank_author() {
        let req = CommentRequest {
            author: " ".to_string(),
            content: "text".to_string(),
        };

        let err = req.validate().expect_err("author must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "author", .. }));
    }
}
