#[cfg(test)]
mod tests {
    use crate::errors::AuthError;
    use crate::errors::internal::{AuditError, CredentialError, InternalError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_includes_operation() {
        let db_err = DbErr::RecordNotFound("test record".to_string());
        let error = InternalError::database("find_by_username", db_err);

        let error_string = error.to_string();
        assert!(error_string.contains("find_by_username"));
        assert!(error_string.contains("Database error"));
    }

    #[test]
    fn test_crypto_error_includes_operation() {
        let error = InternalError::crypto("bcrypt_hash", "invalid cost");

        let error_string = error.to_string();
        assert!(error_string.contains("bcrypt_hash"));
        assert!(error_string.contains("invalid cost"));
    }

    #[test]
    fn test_credential_errors_map_to_typed_auth_errors() {
        let err: AuthError = InternalError::from(CredentialError::DuplicateUsername("bob".into())).into();
        assert_eq!(err, AuthError::DuplicateUsername("bob".into()));

        let err: AuthError = InternalError::from(CredentialError::RoleNotFound("AUDITOR".into())).into();
        assert_eq!(err, AuthError::NotFound("Role AUDITOR".into()));
    }

    #[test]
    fn test_infrastructure_errors_map_to_store_unavailable() {
        let err: AuthError =
            InternalError::database("increment_failed_attempts", DbErr::Custom("disk I/O error".into())).into();
        assert_eq!(err.code(), "store_unavailable");

        let err: AuthError = InternalError::from(AuditError::LogWriteFailed("closed".into())).into();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }

    #[test]
    fn test_store_unavailable_names_failed_operation() {
        let err: AuthError =
            InternalError::database("record_successful_login", DbErr::Custom("database is locked".into())).into();
        match err {
            AuthError::StoreUnavailable(detail) => {
                assert!(detail.contains("record_successful_login"));
                assert!(detail.contains("database is locked"));
            }
            other => panic!("expected StoreUnavailable, got {:?}", other),
        }

        let err: AuthError = InternalError::transaction_begin(DbErr::Custom("pool timed out".into())).into();
        assert!(matches!(err, AuthError::StoreUnavailable(detail) if detail.contains("Starting transaction")));
    }

    #[test]
    fn test_user_message_does_not_leak_store_details() {
        let err = AuthError::StoreUnavailable("connection refused at 10.0.0.3:5432".into());
        assert!(!err.user_message().contains("10.0.0.3"));
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        assert_eq!(AuthError::InvalidCredentials.user_message(), "Invalid username or password");
    }
}
