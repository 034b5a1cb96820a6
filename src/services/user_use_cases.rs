//! Application use cases for user management.
//!
//! Each use case applies at most one guard before delegating to a single
//! repository call. Errors are returned to the caller untouched apart from
//! the guard failures below.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::{Pagination, UserId};
use crate::models::user::{CreateUserInput, UpdateUserInput, User};
use crate::repositories::{RepositoryError, UserRepository};

#[derive(Debug, Error)]
pub enum UserError {
    /// A required field was missing; raised before any request is sent.
    #[error("{0}")]
    Validation(String),

    /// The existence check ahead of a mutation came back empty.
    #[error("User not found")]
    NotFound(UserId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl UserError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub struct CreateUserUseCase {
    repository: Arc<dyn UserRepository>,
}

impl CreateUserUseCase {
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// [`UserError::Validation`] when `email` or `username` is empty. Format
    /// and length rules belong to the form; the backend has the final say.
    pub async fn execute(&self, input: &CreateUserInput) -> Result<User, UserError> {
        if input.email.is_empty() || input.username.is_empty() {
            return Err(UserError::validation("Email and username are required"));
        }

        Ok(self.repository.create(input).await?)
    }
}

pub struct GetUserByIdUseCase {
    repository: Arc<dyn UserRepository>,
}

impl GetUserByIdUseCase {
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: UserId) -> Result<Option<User>, UserError> {
        Ok(self.repository.get_by_id(id).await?)
    }
}

pub struct GetAllUsersUseCase {
    repository: Arc<dyn UserRepository>,
}

impl GetAllUsersUseCase {
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, pagination: Pagination) -> Result<Vec<User>, UserError> {
        Ok(self.repository.get_all(pagination).await?)
    }
}

pub struct UpdateUserUseCase {
    repository: Arc<dyn UserRepository>,
}

impl UpdateUserUseCase {
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// [`UserError::NotFound`] when the user does not exist; no update is
    /// sent in that case. If the record vanishes between the check and the
    /// write, the backend's own 404 surfaces as [`UserError::Repository`].
    pub async fn execute(&self, id: UserId, input: &UpdateUserInput) -> Result<User, UserError> {
        if self.repository.get_by_id(id).await?.is_none() {
            debug!(user_id = %id, "Refusing to update missing user");
            return Err(UserError::NotFound(id));
        }

        Ok(self.repository.update(id, input).await?)
    }
}

pub struct DeleteUserUseCase {
    repository: Arc<dyn UserRepository>,
}

impl DeleteUserUseCase {
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Same check-then-act contract as [`UpdateUserUseCase::execute`].
    pub async fn execute(&self, id: UserId) -> Result<(), UserError> {
        if self.repository.get_by_id(id).await?.is_none() {
            debug!(user_id = %id, "Refusing to delete missing user");
            return Err(UserError::NotFound(id));
        }

        Ok(self.repository.delete(id).await?)
    }
}

/// The five use cases wired to one repository.
pub struct UserUseCases {
    pub create: CreateUserUseCase,
    pub get_by_id: GetUserByIdUseCase,
    pub get_all: GetAllUsersUseCase,
    pub update: UpdateUserUseCase,
    pub delete: DeleteUserUseCase,
}

impl UserUseCases {
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            create: CreateUserUseCase::new(repository.clone()),
            get_by_id: GetUserByIdUseCase::new(repository.clone()),
            get_all: GetAllUsersUseCase::new(repository.clone()),
            update: UpdateUserUseCase::new(repository.clone()),
            delete: DeleteUserUseCase::new(repository),
        }
    }
}
