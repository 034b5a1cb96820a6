pub mod user_use_cases;

pub use user_use_cases::{
    CreateUserUseCase, DeleteUserUseCase, GetAllUsersUseCase, GetUserByIdUseCase,
    UpdateUserUseCase, UserError, UserUseCases,
};
