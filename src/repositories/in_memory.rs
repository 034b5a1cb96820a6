//! Recording in-memory repository for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;

use crate::domain::{Pagination, UserId};
use crate::models::user::{CreateUserInput, UpdateUserInput, User};
use crate::repositories::user_repository::{RepositoryError, UserRepository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetAll(Pagination),
    GetById(UserId),
    Create(CreateUserInput),
    Update(UserId, UpdateUserInput),
    Delete(UserId),
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<i64>,
    fail_with: Mutex<Option<StatusCode>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(1),
            ..Default::default()
        }
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let next = users.iter().map(|u| u.id.value()).max().unwrap_or(0) + 1;
        let repo = Self::new();
        *repo.users.lock().unwrap() = users;
        *repo.next_id.lock().unwrap() = next;
        repo
    }

    /// Every subsequent call answers with this status.
    pub fn fail_with(&self, status: StatusCode) {
        *self.fail_with.lock().unwrap() = Some(status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), RepositoryError> {
        self.calls.lock().unwrap().push(call);
        match *self.fail_with.lock().unwrap() {
            Some(status) => Err(RepositoryError::Status {
                status,
                body: String::new(),
            }),
            None => Ok(()),
        }
    }

    fn missing() -> RepositoryError {
        RepositoryError::Status {
            status: StatusCode::NOT_FOUND,
            body: r#"{"detail":"User not found"}"#.to_string(),
        }
    }
}

pub fn sample_user(id: i64, username: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId::new(id),
        email: format!("{username}@example.com"),
        username: username.to_string(),
        full_name: None,
        is_active: true,
        is_superuser: false,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_all(&self, pagination: Pagination) -> Result<Vec<User>, RepositoryError> {
        self.record(Call::GetAll(pagination))?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .skip(pagination.skip as usize)
            .take(pagination.limit as usize)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.record(Call::GetById(id))?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, input: &CreateUserInput) -> Result<User, RepositoryError> {
        self.record(Call::Create(input.clone()))?;
        let mut next_id = self.next_id.lock().unwrap();
        let mut user = sample_user(*next_id, &input.username);
        *next_id += 1;
        user.email.clone_from(&input.email);
        user.full_name.clone_from(&input.full_name);
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, input: &UpdateUserInput) -> Result<User, RepositoryError> {
        self.record(Call::Update(id, input.clone()))?;
        let mut users = self.users.lock().unwrap();
        let user = users.iter_mut().find(|u| u.id == id).ok_or_else(Self::missing)?;
        if let Some(email) = &input.email {
            user.email.clone_from(email);
        }
        if let Some(username) = &input.username {
            user.username.clone_from(username);
        }
        if input.full_name.is_some() {
            user.full_name.clone_from(&input.full_name);
        }
        if let Some(active) = input.is_active {
            user.is_active = active;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        self.record(Call::Delete(id))?;
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(Self::missing());
        }
        Ok(())
    }
}
