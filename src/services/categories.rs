//! Category management service

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, NewCategoryDto},
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a category; the name must be free
    pub async fn create(&self, new: &NewCategoryDto) -> AppResult<Category> {
        if self.repository.categories.exists_by_name(&new.name).await? {
            tracing::warn!("Category {} already exists", new.name);
            return Err(AppError::Conflict(format!(
                "Category {} already exists",
                new.name
            )));
        }
        self.repository.categories.create(&new.name).await
    }

    /// Rename a category; renaming to its own current name is allowed,
    /// taking a name owned by a different category is a conflict
    pub async fn update(&self, id: i64, new: &NewCategoryDto) -> AppResult<Category> {
        let category = self.repository.categories.get_by_id(id).await?;

        if category.name != new.name {
            if let Some(existing) = self.repository.categories.find_by_name(&new.name).await? {
                if existing.id != id {
                    tracing::warn!("Category named {} already exists", new.name);
                    return Err(AppError::Conflict(format!(
                        "Category named {} already exists",
                        new.name
                    )));
                }
            }
        }

        self.repository.categories.rename(id, &new.name).await
    }

    /// Delete a category by id
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.categories.get_by_id(id).await?;
        self.repository.categories.delete(id).await
    }

    /// List categories with pagination
    pub async fn list(&self, from: Option<i64>, size: Option<i64>) -> AppResult<Vec<Category>> {
        let (from, size) = super::page_params(from, size);
        self.repository.categories.list(from, size).await
    }

    /// Get category by id
    pub async fn get_by_id(&self, id: i64) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }
}
