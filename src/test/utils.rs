// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use migration::{AuditMigrator, AuthMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::SecuritySettings;
use crate::errors::InternalError;
use crate::errors::internal::AuditError;
use crate::providers::{HashAlgorithm, ManualClock};
use crate::stores::{ActivityLog, AuditStore, CredentialStore, SqlCredentialStore};
use crate::types::{ActivityKind, ActivityRecord, NewPrincipalRecord, PasswordHash, PrincipalId, RoleId};

/// Fixed start time for ManualClock in tests
pub fn test_epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
}

/// Security settings with a cheap bcrypt cost
pub fn test_security_settings() -> SecuritySettings {
    SecuritySettings {
        lockout_threshold: 5,
        hash_algorithm: HashAlgorithm::Bcrypt { cost: 4 },
    }
}

/// Creates test databases and stores
///
/// Returns (auth_db, audit_db, credential_store, audit_store)
///
/// Callers can discard what they don't need:
/// ```rust
/// let (db, _audit_db, credential_store, _audit_store) = setup_test_stores().await;
/// let (_db, _audit_db, _credential_store, audit_store) = setup_test_stores().await;
/// ```
pub async fn setup_test_stores() -> (
    DatabaseConnection,
    DatabaseConnection,
    Arc<dyn CredentialStore>,
    Arc<AuditStore>,
) {
    let auth_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    AuthMigrator::up(&auth_db, None)
        .await
        .expect("Failed to run auth migrations");

    let audit_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");

    AuditMigrator::up(&audit_db, None)
        .await
        .expect("Failed to run audit migrations");

    let audit_store = Arc::new(AuditStore::new(audit_db.clone()));
    let credential_store: Arc<dyn CredentialStore> = Arc::new(SqlCredentialStore::new(auth_db.clone()));

    (auth_db, audit_db, credential_store, audit_store)
}

/// Full service setup over in-memory SQLite with a manual clock
///
/// Returns (app_data, audit_store, clock)
pub async fn setup_test_app() -> (Arc<AppData>, Arc<AuditStore>, Arc<ManualClock>) {
    let (_db, _audit_db, credential_store, audit_store) = setup_test_stores().await;
    let clock = Arc::new(ManualClock::new(test_epoch()));

    let app_data = Arc::new(AppData::from_parts(
        credential_store,
        audit_store.clone(),
        clock.clone(),
        test_security_settings(),
    ));

    (app_data, audit_store, clock)
}

/// Same as `setup_test_app` but every activity-log append fails
pub async fn setup_test_app_with_broken_audit() -> Arc<AppData> {
    let (_db, _audit_db, credential_store, _audit_store) = setup_test_stores().await;

    Arc::new(AppData::from_parts(
        credential_store,
        Arc::new(FailingActivityLog),
        Arc::new(ManualClock::new(test_epoch())),
        test_security_settings(),
    ))
}

/// Insert-ready record for `username` with email `<username>@example.com`
///
/// The hash is a placeholder and will not verify any password.
pub fn principal_record(username: &str, roles: &[&str]) -> NewPrincipalRecord {
    NewPrincipalRecord {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: PasswordHash("$2b$04$placeholderplaceholderplaceholderplaceholderpla".to_string()),
        first_name: None,
        last_name: None,
        roles: roles.iter().map(|r| RoleId::from(*r)).collect(),
        must_change_password: false,
        created_by: "test".to_string(),
        created_at: test_epoch(),
    }
}

/// Create a principal directly through the store
pub async fn seed_principal(
    store: &Arc<dyn CredentialStore>,
    username: &str,
    roles: &[&str],
) -> PrincipalId {
    store
        .create_principal(principal_record(username, roles))
        .await
        .expect("Failed to seed principal")
}

/// Activity log kept in memory
#[derive(Default)]
pub struct MemoryActivityLog {
    records: Mutex<Vec<ActivityRecord>>,
}

impl MemoryActivityLog {
    pub fn records(&self) -> Vec<ActivityRecord> {
        self.records.lock().expect("poisoned").clone()
    }

    pub fn kinds(&self) -> Vec<ActivityKind> {
        self.records().into_iter().map(|r| r.kind).collect()
    }
}

#[async_trait]
impl ActivityLog for MemoryActivityLog {
    async fn append(&self, record: ActivityRecord) -> Result<(), InternalError> {
        self.records.lock().expect("poisoned").push(record);
        Ok(())
    }
}

/// Activity log that rejects every write
pub struct FailingActivityLog;

#[async_trait]
impl ActivityLog for FailingActivityLog {
    async fn append(&self, _record: ActivityRecord) -> Result<(), InternalError> {
        Err(AuditError::LogWriteFailed("activity log offline".to_string()).into())
    }
}
