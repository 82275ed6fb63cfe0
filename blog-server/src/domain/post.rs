use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::error::DomainError;

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 5;
pub(crate) const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image: Option<String>,
    pub(crate) category: Option<Category>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// Payload of both create and full-replace update: every field is written,
/// so omitted optional fields end up cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image: Option<String>,
    pub(crate) category_id: Option<i64>,
}

impl PostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if let Some(category_id) = self.category_id {
            validate_positive_i64("category_id", category_id)?;
        }

        Ok(Self {
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            image: normalize_image(self.image),
            category_id: self.category_id,
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        image: Option<String>,
        category: Option<Category>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        let title = normalize_title(&title.into())?;
        let content = normalize_content(&content.into())?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            title,
            content,
            image: normalize_image(image),
            category,
            created_at,
            updated_at,
        })
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}

fn normalize_image(image: Option<String>) -> Option<String> {
    image
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{DomainError, Post, PostRequest};

    #[test]
    fn post_request_validate_rejects_empty_title() {
        let req = request("   ", "valid content");

        let err = req.validate().expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn post_request_validate_rejects_empty_content() {
        let req = request("valid title", "   ");

        let err = req.validate().expect_err("content must be rejected");
        assert_validation_field(err, "content");
    }

    #[test]
    fn post_request_validate_normalizes_fields() {
        let req = PostRequest {
            title: "  title  ".to_string(),
            content: "  content  ".to_string(),
            image: Some("   ".to_string()),
            category_id: Some(3),
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title, "title");
        assert_eq!(validated.content, "content");
        assert_eq!(validated.image, None);
        assert_eq!(validated.category_id, Some(3));
    }

    #[test]
    fn post_request_validate_rejects_non_positive_category() {
        let req = PostRequest {
            category_id: Some(0),
            ..request("title", "content")
        };

        let err = req.validate().expect_err("category_id must be > 0");
        assert_validation_field(err, "category_id");
    }

    #[test]
    fn post_new_normalizes_and_builds_post() {
        let created_at = Utc::now();
        let updated_at = created_at + Duration::seconds(1);

        let post = Post::new(
            1,
            "  Title  ",
            "  Content  ",
            Some(" /uploads/cover.png ".to_string()),
            None,
            created_at,
            updated_at,
        )
        .expect("post should be created");

        assert_eq!(post.id, 1);
        assert_eq!(post.title, "Title");
        assert_eq!(post.content, "Content");
        assert_eq!(post.image.as_deref(), Some("/uploads/cover.png"));
    }

    #[test]
    fn post_new_rejects_updated_before_created() {
        let updated_at = Utc::now();
        let created_at = updated_at + Duration::seconds(1);

        let err = Post::new(1, "Title", "Content", None, None, created_at, updated_at)
            .expect_err("updated_at < created_at must fail");
        assert_validation_field(err, "updated_at");
    }

    fn request(title: &str, content: &str) -> PostRequest {
        PostRequest {
            title: title.to_string(),
            content: content.to_string(),
            image: None,
            category_id: None,
        }
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
