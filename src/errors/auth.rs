use thiserror::Error;

use super::internal::{CredentialError, InternalError};

/// Errors returned to callers of the authentication and account operations
///
/// Policy and validation failures are typed so the caller can render a
/// specific message. Persistence faults collapse into `StoreUnavailable`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password; the two are indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Account is locked")]
    AccountLocked,

    /// Password policy violation with the first failing rule's reason
    #[error("{0}")]
    WeakPassword(String),

    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    #[error("Invalid email format")]
    InvalidEmail,

    /// A required field was blank
    #[error("{0} is required")]
    InvalidInput(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    /// Principal or role reference did not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Role already assigned")]
    AlreadyAssigned,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AuthError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountInactive => "account_inactive",
            AuthError::AccountLocked => "account_locked",
            AuthError::WeakPassword(_) => "weak_password",
            AuthError::InvalidCurrentPassword => "invalid_current_password",
            AuthError::InvalidEmail => "invalid_email",
            AuthError::InvalidInput(_) => "invalid_input",
            AuthError::DuplicateUsername(_) => "duplicate_username",
            AuthError::DuplicateEmail(_) => "duplicate_email",
            AuthError::NotFound(_) => "not_found",
            AuthError::AlreadyAssigned => "already_assigned",
            AuthError::Forbidden => "forbidden",
            AuthError::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Message safe to show the end user
    ///
    /// Store details are never included.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Invalid username or password".to_string(),
            AuthError::AccountInactive => {
                "Account is inactive. Please contact an administrator.".to_string()
            }
            AuthError::AccountLocked => {
                "Account is locked due to too many failed login attempts. Please contact an administrator.".to_string()
            }
            AuthError::WeakPassword(reason) => reason.clone(),
            AuthError::InvalidCurrentPassword => "Current password is incorrect".to_string(),
            AuthError::InvalidEmail => "Invalid email format".to_string(),
            AuthError::InvalidInput(field) => format!("{} is required", field),
            AuthError::DuplicateUsername(_) => "Username already exists".to_string(),
            AuthError::DuplicateEmail(_) => "Email already exists".to_string(),
            AuthError::NotFound(what) => format!("{} not found", what),
            AuthError::AlreadyAssigned => "User already has this role".to_string(),
            AuthError::Forbidden => {
                "You do not have permission to perform this action".to_string()
            }
            AuthError::StoreUnavailable(_) => {
                "Service temporarily unavailable. Please try again later.".to_string()
            }
        }
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::PrincipalNotFound(id) => AuthError::NotFound(format!("User {}", id)),
            CredentialError::RoleNotFound(id) => AuthError::NotFound(format!("Role {}", id)),
            CredentialError::DuplicateUsername(name) => AuthError::DuplicateUsername(name),
            CredentialError::DuplicateEmail(email) => AuthError::DuplicateEmail(email),
        }
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Credential(e) => e.into(),
            other => AuthError::StoreUnavailable(other.to_string()),
        }
    }
}
