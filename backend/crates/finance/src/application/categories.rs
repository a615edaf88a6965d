//! Category Service
//!
//! CRUD over a user's categories. The connected user arrives as the
//! verified owner email; every operation is scoped to it.

use std::sync::Arc;

use crate::domain::entities::Category;
use crate::domain::repository::CategoryRepository;
use crate::domain::value_objects::{CategoryId, CategoryKind};
use crate::error::{FinanceError, FinanceResult};

/// Category create/update payload
pub struct CategoryInput {
    pub name: String,
    pub kind: CategoryKind,
}

impl CategoryInput {
    fn validated(self) -> FinanceResult<Self> {
        if self.name.trim().is_empty() {
            return Err(FinanceError::Validation("Name is mandatory".to_string()));
        }
        Ok(self)
    }
}

/// Category application service
pub struct CategoryService<R>
where
    R: CategoryRepository,
{
    repo: Arc<R>,
}

impl<R> CategoryService<R>
where
    R: CategoryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, owner_email: &str, input: CategoryInput) -> FinanceResult<Category> {
        let input = input.validated()?;

        let category = Category::new(owner_email.to_string(), input.name, input.kind);
        self.repo.create(&category).await?;

        tracing::info!(owner = owner_email, category_id = %category.id, "Category created");

        Ok(category)
    }

    pub async fn list(&self, owner_email: &str) -> FinanceResult<Vec<Category>> {
        self.repo.find_by_owner(owner_email).await
    }

    pub async fn get(&self, owner_email: &str, id: &CategoryId) -> FinanceResult<Category> {
        self.repo
            .find_by_id_and_owner(id, owner_email)
            .await?
            .ok_or(FinanceError::CategoryNotFound)
    }

    pub async fn update(
        &self,
        owner_email: &str,
        id: &CategoryId,
        input: CategoryInput,
    ) -> FinanceResult<Category> {
        let input = input.validated()?;

        let mut category = self.get(owner_email, id).await?;
        category.apply_update(input.name, input.kind);
        self.repo.update(&category).await?;

        Ok(category)
    }

    pub async fn delete(&self, owner_email: &str, id: &CategoryId) -> FinanceResult<CategoryId> {
        if !self.repo.delete(id, owner_email).await? {
            return Err(FinanceError::CategoryNotFound);
        }

        tracing::info!(owner = owner_email, category_id = %id, "Category deleted");

        Ok(*id)
    }
}
