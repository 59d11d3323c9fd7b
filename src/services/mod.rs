// Services layer - Business logic and orchestration
pub mod admin_service;
pub mod auth_service;
pub mod authorization;
pub mod password_validator;

#[cfg(test)]
mod password_validator_test;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use password_validator::{PasswordValidationError, validate_email, validate_password};
