use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::category_service::CategoryService;
use crate::application::comment_service::CommentService;
use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::repositories::Repositories;
use crate::data::user_repository::UserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod extract;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) type SharedBlogService = BlogService<Arc<dyn PostRepository>>;
pub(crate) type SharedCategoryService = CategoryService<Arc<dyn CategoryRepository>>;
pub(crate) type SharedCommentService =
    CommentService<Arc<dyn CommentRepository>, Arc<dyn PostRepository>>;
pub(crate) type SharedAuthService = AuthService<Arc<dyn UserRepository>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<SharedAuthService>,
    pub(crate) blog_service: Arc<SharedBlogService>,
    pub(crate) category_service: Arc<SharedCategoryService>,
    pub(crate) comment_service: Arc<SharedCommentService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(repos: Repositories, jwt: Arc<JwtService>) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(repos.users, Arc::clone(&jwt))),
            blog_service: Arc::new(BlogService::new(Arc::clone(&repos.posts))),
            category_service: Arc::new(CategoryService::new(repos.categories)),
            comment_service: Arc::new(CommentService::new(repos.comments, repos.posts)),
            jwt,
        }
    }
}
