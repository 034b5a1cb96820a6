//! Create/edit user form.
//!
//! Field rules are stricter than the create use case: the email must look
//! like `x@y.z` and usernames need at least three characters.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::cli::prompt;
use crate::cli::routes::Route;
use crate::constants::validation::{EMAIL_PATTERN, MIN_USERNAME_LEN};
use crate::domain::UserId;
use crate::models::user::{CreateUserInput, UpdateUserInput, User};
use crate::store::UserStore;

const MAX_ATTEMPTS: usize = 3;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("Invalid regex"))
}

/// Error slots of the form. `Submit` holds the message of a failed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Email,
    Username,
    FullName,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(UserId),
}

/// Values supplied up front, e.g. from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub email: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserForm {
    mode: FormMode,
    email: String,
    username: String,
    full_name: String,
    errors: BTreeMap<FormField, String>,
}

impl UserForm {
    #[must_use]
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            email: String::new(),
            username: String::new(),
            full_name: String::new(),
            errors: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Email => &self.email,
            FormField::Username => &self.username,
            FormField::FullName => &self.full_name,
            FormField::Submit => "",
        }
    }

    #[must_use]
    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<FormField, String> {
        &self.errors
    }

    pub fn prefill(&mut self, user: &User) {
        self.email.clone_from(&user.email);
        self.username.clone_from(&user.username);
        self.full_name = user.full_name.clone().unwrap_or_default();
    }

    /// Updates a field and clears its error.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Email => &mut self.email,
            FormField::Username => &mut self.username,
            FormField::FullName => &mut self.full_name,
            FormField::Submit => return,
        };
        *slot = value.into();
        self.errors.remove(&field);
    }

    pub fn apply(&mut self, values: FormValues) {
        if let Some(email) = values.email {
            self.set_field(FormField::Email, email);
        }
        if let Some(username) = values.username {
            self.set_field(FormField::Username, username);
        }
        if let Some(full_name) = values.full_name {
            self.set_field(FormField::FullName, full_name);
        }
    }

    /// Replaces all errors with the current field errors.
    pub fn validate(&mut self) -> bool {
        let mut errors = BTreeMap::new();

        if self.email.is_empty() {
            errors.insert(FormField::Email, "Email is required".to_string());
        } else if !email_regex().is_match(&self.email) {
            errors.insert(FormField::Email, "Email is invalid".to_string());
        }

        if self.username.is_empty() {
            errors.insert(FormField::Username, "Username is required".to_string());
        } else if self.username.chars().count() < MIN_USERNAME_LEN {
            errors.insert(
                FormField::Username,
                format!("Username must be at least {MIN_USERNAME_LEN} characters"),
            );
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    fn create_input(&self) -> CreateUserInput {
        CreateUserInput {
            email: self.email.clone(),
            username: self.username.clone(),
            full_name: (!self.full_name.is_empty()).then(|| self.full_name.clone()),
        }
    }

    fn update_input(&self) -> UpdateUserInput {
        UpdateUserInput {
            email: Some(self.email.clone()),
            username: Some(self.username.clone()),
            full_name: Some(self.full_name.clone()),
            is_active: None,
        }
    }

    /// Validates, then performs one create or update round trip.
    /// Returns where to navigate on success.
    pub async fn submit(&mut self, store: &mut UserStore) -> Option<Route> {
        if !self.validate() {
            return None;
        }

        let result = match self.mode {
            FormMode::Create => store.create_user(&self.create_input()).await.map(|_| ()),
            FormMode::Edit(id) => store.update_user(id, &self.update_input()).await.map(|_| ()),
        };

        match result {
            Ok(()) => Some(Route::Users),
            Err(e) => {
                debug!(error = %e, "Form submission failed");
                self.errors = BTreeMap::from([(FormField::Submit, e.to_string())]);
                None
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let title = match self.mode {
            FormMode::Create => "Create User",
            FormMode::Edit(_) => "Edit User",
        };
        writeln!(out, "{title}")?;
        writeln!(out, "{:-<60}", "")?;

        for (field, label) in [
            (FormField::Email, "Email *"),
            (FormField::Username, "Username *"),
            (FormField::FullName, "Full Name"),
        ] {
            writeln!(out, "{label:<12} {}", self.value(field))?;
            if let Some(err) = self.error(field) {
                writeln!(out, "             ! {err}")?;
            }
        }

        if let Some(err) = self.error(FormField::Submit) {
            writeln!(out)?;
            writeln!(out, "Error: {err}")?;
        }

        Ok(())
    }

    fn prompt_fields(
        &mut self,
        fields: &[FormField],
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> io::Result<()> {
        for &field in fields {
            let label = match field {
                FormField::Email => "Email",
                FormField::Username => "Username",
                FormField::FullName => "Full Name",
                FormField::Submit => continue,
            };
            let answer = prompt::ask(input, out, label, self.value(field))?;
            self.set_field(field, answer);
        }
        Ok(())
    }
}

/// Runs the form page. Fields missing from `values` are prompted for unless
/// `no_input` is set. Returns the route to show next after a successful save.
pub async fn cmd_user_form(
    store: &mut UserStore,
    mode: FormMode,
    values: FormValues,
    no_input: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<Option<Route>> {
    let mut form = UserForm::new(mode);

    if let FormMode::Edit(id) = mode {
        store.fetch_user(id).await;
        let state = store.state();
        if let Some(err) = &state.error {
            writeln!(out, "Error: {err}")?;
            return Ok(None);
        }
        let Some(user) = &state.selected_user else {
            writeln!(out, "User not found")?;
            return Ok(None);
        };
        form.prefill(user);
    }

    let missing: Vec<FormField> = [
        (FormField::Email, values.email.is_none()),
        (FormField::Username, values.username.is_none()),
        (FormField::FullName, values.full_name.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    form.apply(values);

    if !no_input && !missing.is_empty() {
        writeln!(
            out,
            "{}",
            match mode {
                FormMode::Create => "Create User",
                FormMode::Edit(_) => "Edit User",
            }
        )?;
        form.prompt_fields(&missing, input, out)?;
    }

    for attempt in 1..=MAX_ATTEMPTS {
        if form.validate() {
            break;
        }

        form.render(out)?;
        if no_input || attempt == MAX_ATTEMPTS {
            return Ok(None);
        }

        let invalid: Vec<FormField> = form.errors().keys().copied().collect();
        form.prompt_fields(&invalid, input, out)?;
    }

    match form.submit(store).await {
        Some(route) => {
            let verb = match mode {
                FormMode::Create => "Created",
                FormMode::Edit(_) => "Updated",
            };
            writeln!(out, "✓ {verb} user {}", form.value(FormField::Username))?;
            Ok(Some(route))
        }
        None => {
            form.render(out)?;
            Ok(None)
        }
    }
}
