use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewCategory {
    pub(crate) name: String,
}

#[async_trait]
pub(crate) trait CategoryRepository: Send + Sync {
    /// Fails with `DomainError::AlreadyExists` when the name is taken.
    async fn create_category(&self, input: NewCategory) -> Result<Category, DomainError>;
    async fn list_categories(&self) -> Result<Vec<Category>, DomainError>;
}

#[async_trait]
impl<T: CategoryRepository + ?Sized> CategoryRepository for Arc<T> {
    async fn create_category(&self, input: NewCategory) -> Result<Category, DomainError> {
        (**self).create_category(input).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        (**self).list_categories().await
    }
}
