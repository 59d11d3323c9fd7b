use std::sync::LazyLock;

use regex::Regex;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols accepted by the special-character rule
pub const PASSWORD_SYMBOLS: &str = r#"!@#$%^&*()_+-=[]{};:'",.<>?/\|`~"#;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Errors that can occur during password validation
///
/// Only the first failing rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    #[error("Password must be at least {0} characters long")]
    TooShort(usize),

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one digit")]
    MissingDigit,

    #[error("Password must contain at least one special character")]
    MissingSymbol,
}

/// Validate a password against the strength rules
///
/// Rules are checked in a fixed order (length, uppercase, lowercase, digit,
/// symbol) and the first violation wins, so the reason is deterministic.
/// Only ASCII letters satisfy the case rules.
///
/// # Returns
/// * `Ok(())` - Password passes all rules
/// * `Err(PasswordValidationError)` - The first rule the password fails
pub fn validate_password(password: &str) -> Result<(), PasswordValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordValidationError::TooShort(MIN_PASSWORD_LENGTH));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordValidationError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordValidationError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordValidationError::MissingDigit);
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err(PasswordValidationError::MissingSymbol);
    }
    Ok(())
}

/// Format check for an email address (local-part@domain.tld)
///
/// Not a deliverability check.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}
