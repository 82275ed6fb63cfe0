use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::app_error::{ErrorBody, FieldViolation};
use crate::presentation::handlers::MessageDto;
use crate::presentation::handlers::auth::{AuthResponseDto, LoginDto, MeDto, RegisterDto, UserDto};
use crate::presentation::handlers::categories::{CategoryDto, CreateCategoryDto};
use crate::presentation::handlers::comments::{CommentDto, CommentPayloadDto};
use crate::presentation::handlers::posts::{ListPostsResponseDto, PostDto, PostPayloadDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::me,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::categories::list_categories,
        crate::presentation::handlers::categories::create_category,
        crate::presentation::handlers::comments::list_comments,
        crate::presentation::handlers::comments::create_comment,
        crate::presentation::handlers::comments::update_comment,
        crate::presentation::handlers::comments::delete_comment
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            MeDto,
            PostPayloadDto,
            PostDto,
            ListPostsResponseDto,
            CreateCategoryDto,
            CategoryDto,
            CommentPayloadDto,
            CommentDto,
            MessageDto,
            ErrorBody,
            FieldViolation
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "posts", description = "Post endpoints"),
        (name = "categories", description = "Category endpoints"),
        (name = "comments", description = "Comment endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
