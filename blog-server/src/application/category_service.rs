use tracing::info;

use crate::data::category_repository::{CategoryRepository, NewCategory};
use crate::domain::category::{Category, CreateCategoryRequest};
use crate::domain::error::DomainError;

pub(crate) struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_category(
        &self,
        req: CreateCategoryRequest,
    ) -> Result<Category, DomainError> {
        let req = req.validate()?;
        let category = self
            .repo
            .create_category(NewCategory { name: req.name })
            .await?;
        info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub(crate) async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.repo.list_categories().await
    }
}
