pub mod http_user_repository;
pub mod user_repository;

#[cfg(test)]
pub(crate) mod in_memory;

pub use http_user_repository::HttpUserRepository;
pub use user_repository::{RepositoryError, UserRepository};
