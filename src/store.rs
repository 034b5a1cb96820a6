//! Client-side cache of user records plus the UI status flags.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Pagination, UserId};
use crate::models::user::{CreateUserInput, UpdateUserInput, User};
use crate::repositories::UserRepository;
use crate::services::{UserError, UserUseCases};

/// What the views render from. `loading`, `error` and the data fields are
/// independent flags; there are no intermediate states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    pub users: Vec<User>,
    pub selected_user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct UserStore {
    use_cases: UserUseCases,
    state: UserState,
}

impl UserStore {
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            use_cases: UserUseCases::new(repository),
            state: UserState::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &UserState {
        &self.state
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error = None;
    }

    fn fail(&mut self, err: &UserError) {
        warn!(error = %err, "User action failed");
        self.state.error = Some(err.to_string());
        self.state.loading = false;
    }

    pub async fn fetch_users(&mut self, pagination: Pagination) {
        self.begin();
        match self.use_cases.get_all.execute(pagination).await {
            Ok(users) => {
                debug!(count = users.len(), "Fetched users");
                self.state.users = users;
                self.state.loading = false;
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Loads one user into `selected_user`; a missing user leaves it `None`.
    pub async fn fetch_user(&mut self, id: UserId) {
        self.begin();
        match self.use_cases.get_by_id.execute(id).await {
            Ok(user) => {
                self.state.selected_user = user;
                self.state.loading = false;
            }
            Err(e) => self.fail(&e),
        }
    }

    /// # Errors
    ///
    /// The error is recorded in the state and also returned, so forms can
    /// show it next to their fields.
    pub async fn create_user(&mut self, input: &CreateUserInput) -> Result<User, UserError> {
        self.begin();
        match self.use_cases.create.execute(input).await {
            Ok(user) => {
                self.state.users.push(user.clone());
                self.state.loading = false;
                Ok(user)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    pub async fn update_user(
        &mut self,
        id: UserId,
        input: &UpdateUserInput,
    ) -> Result<User, UserError> {
        self.begin();
        match self.use_cases.update.execute(id, input).await {
            Ok(user) => {
                if let Some(existing) = self.state.users.iter_mut().find(|u| u.id == id) {
                    *existing = user.clone();
                }
                if self.state.selected_user.as_ref().is_some_and(|u| u.id == id) {
                    self.state.selected_user = Some(user.clone());
                }
                self.state.loading = false;
                Ok(user)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    pub async fn delete_user(&mut self, id: UserId) -> Result<(), UserError> {
        self.begin();
        match self.use_cases.delete.execute(id).await {
            Ok(()) => {
                self.state.users.retain(|u| u.id != id);
                if self.state.selected_user.as_ref().is_some_and(|u| u.id == id) {
                    self.state.selected_user = None;
                }
                self.state.loading = false;
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }
}
