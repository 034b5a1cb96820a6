//! Data access contract for user records.
//!
//! The use-case layer depends only on [`UserRepository`]; the HTTP
//! implementation lives in [`super::http_user_repository`].

use crate::domain::{Pagination, UserId};
use crate::models::user::{CreateUserInput, UpdateUserInput, User};
use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by a repository call.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl RepositoryError {
    /// HTTP status of the failed response, if the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// CRUD operations against the users collection.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_all(&self, pagination: Pagination) -> Result<Vec<User>, RepositoryError>;

    /// Fetches one user. A missing record is `Ok(None)`, not an error.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn create(&self, input: &CreateUserInput) -> Result<User, RepositoryError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// A record that disappeared is reported as [`RepositoryError::Status`]
    /// with `404`, exactly as the backend answered.
    async fn update(&self, id: UserId, input: &UpdateUserInput) -> Result<User, RepositoryError>;

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;
}
