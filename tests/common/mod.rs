// Common test utilities for integration tests

use std::sync::Arc;

use migration::{AuditMigrator, AuthMigrator, MigratorTrait};
use report_access::app_data::AppData;
use report_access::config::SecuritySettings;
use report_access::providers::{HashAlgorithm, SystemClock};
use report_access::stores::{AuditStore, CredentialStore, SqlCredentialStore};
use sea_orm::{Database, DatabaseConnection};

/// Creates a test auth database with migrations applied
pub async fn setup_test_auth_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    AuthMigrator::up(&db, None)
        .await
        .expect("Failed to run auth migrations");

    db
}

/// Creates a test audit database with migrations applied
pub async fn setup_test_audit_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");

    AuditMigrator::up(&db, None)
        .await
        .expect("Failed to run audit migrations");

    db
}

/// Fully wired application data over fresh in-memory databases
///
/// Returns (app_data, audit_store) so tests can inspect activity records.
pub async fn setup_test_app(lockout_threshold: u32) -> (Arc<AppData>, Arc<AuditStore>) {
    let credential_store: Arc<dyn CredentialStore> =
        Arc::new(SqlCredentialStore::new(setup_test_auth_db().await));
    let audit_store = Arc::new(AuditStore::new(setup_test_audit_db().await));

    let security = SecuritySettings {
        lockout_threshold,
        hash_algorithm: HashAlgorithm::Bcrypt { cost: 4 },
    };

    let app_data = Arc::new(AppData::from_parts(
        credential_store,
        audit_store.clone(),
        Arc::new(SystemClock),
        security,
    ));

    (app_data, audit_store)
}
