use thiserror::Error;

/// Domain errors raised by the credential store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Email already in use: {0}")]
    DuplicateEmail(String),
}
