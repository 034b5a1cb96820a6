//! Navigation targets shared by the views.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Users,
    CreateUser,
    UserDetail(UserId),
    EditUser(UserId),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("No page at '{0}'")]
pub struct UnknownRoute(String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .trim_start_matches('/')
            .split('/')
            .filter(|seg| !seg.is_empty())
            .collect();

        let unknown = || UnknownRoute(s.to_string());
        let id = |seg: &str| seg.parse::<UserId>().map_err(|_| unknown());

        match segments.as_slice() {
            [] => Ok(Self::Home),
            ["users"] => Ok(Self::Users),
            ["users", "create"] => Ok(Self::CreateUser),
            ["users", raw] => Ok(Self::UserDetail(id(*raw)?)),
            ["users", raw, "edit"] => Ok(Self::EditUser(id(*raw)?)),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "/"),
            Self::Users => write!(f, "/users"),
            Self::CreateUser => write!(f, "/users/create"),
            Self::UserDetail(id) => write!(f, "/users/{id}"),
            Self::EditUser(id) => write!(f, "/users/{id}/edit"),
        }
    }
}
