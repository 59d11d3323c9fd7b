// Errors layer - Error type definitions
pub mod auth;
pub mod internal;

pub use auth::AuthError;
pub use internal::InternalError;

#[cfg(test)]
mod internal_test;
