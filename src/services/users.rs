//! User management service

use crate::{
    error::{AppError, AppResult},
    models::user::{NewUserRequest, User, UserQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List users, optionally restricted to an id set
    pub async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let (from, size) = super::page_params(query.from, query.size);
        self.repository
            .users
            .list(query.ids.as_deref(), from, size)
            .await
    }

    /// Create a user; the email must be free
    pub async fn create(&self, new: &NewUserRequest) -> AppResult<User> {
        if self.repository.users.exists_by_email(&new.email).await? {
            tracing::warn!("User with email {} already exists", new.email);
            return Err(AppError::Conflict(format!(
                "User with email {} already exists",
                new.email
            )));
        }
        self.repository.users.create(&new.email, &new.name).await
    }

    /// Delete a user by id
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}
