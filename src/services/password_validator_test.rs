#[cfg(test)]
mod tests {
    use crate::services::password_validator::{
        PasswordValidationError, validate_email, validate_password,
    };

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("Ab1!"),
            Err(PasswordValidationError::TooShort(8))
        );
        assert_eq!(
            validate_password("Ab1!").unwrap_err().to_string(),
            "Password must be at least 8 characters long"
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 7 characters, more than 8 bytes
        assert_eq!(
            validate_password("Äbcdé1!"),
            Err(PasswordValidationError::TooShort(8))
        );
    }

    #[test]
    fn test_missing_uppercase() {
        assert_eq!(
            validate_password("lowercase1!"),
            Err(PasswordValidationError::MissingUppercase)
        );
    }

    #[test]
    fn test_missing_lowercase() {
        assert_eq!(
            validate_password("UPPERCASE1!"),
            Err(PasswordValidationError::MissingLowercase)
        );
    }

    #[test]
    fn test_case_rules_only_count_ascii_letters() {
        assert_eq!(
            validate_password("Ébcdefg1!"),
            Err(PasswordValidationError::MissingUppercase)
        );
        assert_eq!(
            validate_password("ABCDEFGé1!"),
            Err(PasswordValidationError::MissingLowercase)
        );
    }

    #[test]
    fn test_missing_digit() {
        assert_eq!(
            validate_password("NoDigitsHere!"),
            Err(PasswordValidationError::MissingDigit)
        );
    }

    #[test]
    fn test_missing_symbol() {
        assert_eq!(
            validate_password("NoSymbols123"),
            Err(PasswordValidationError::MissingSymbol)
        );
        assert_eq!(
            validate_password("NoSymbols123").unwrap_err().to_string(),
            "Password must contain at least one special character"
        );
    }

    #[test]
    fn test_first_failure_wins() {
        // fails every rule; length is reported
        assert_eq!(validate_password(""), Err(PasswordValidationError::TooShort(8)));
        // long enough but missing everything else; uppercase is reported
        assert_eq!(
            validate_password("        "),
            Err(PasswordValidationError::MissingUppercase)
        );
        // has upper and lower only; digit comes before symbol
        assert_eq!(
            validate_password("OnlyLetters"),
            Err(PasswordValidationError::MissingDigit)
        );
    }

    #[test]
    fn test_valid_passwords() {
        for password in ["Passw0rd!", "Str0ng#Enough", "a`B9cdefg", "Quote'd1x", "Back\\slash9Z"] {
            assert_eq!(validate_password(password), Ok(()), "{}", password);
        }
    }

    #[test]
    fn test_validate_email_accepts_standard_addresses() {
        for email in ["alice@example.com", "first.last+tag@sub.example.co.uk", "a_b%c-d@x.io"] {
            assert!(validate_email(email), "{}", email);
        }
    }

    #[test]
    fn test_validate_email_rejects_malformed() {
        for email in ["", "plainaddress", "@example.com", "user@", "user@domain", "user@domain.c", "us er@example.com"] {
            assert!(!validate_email(email), "{}", email);
        }
    }
}
