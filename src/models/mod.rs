pub mod user;

pub use user::{CreateUserInput, UpdateUserInput, User};
