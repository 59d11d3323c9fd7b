use migration::{AuditMigrator, AuthMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;

/// Connection pools owned by the process
///
/// The activity log may live in its own database so that audit volume never
/// contends with credential updates.
#[derive(Debug, Clone)]
pub struct DatabaseConnections {
    pub auth: DatabaseConnection,
    pub audit: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect both databases
    ///
    /// Does NOT run migrations - call `migrate()` separately.
    pub async fn init(bootstrap_settings: &BootstrapSettings) -> Result<Self, InternalError> {
        let auth = connect(bootstrap_settings.database_url(), "connect_database").await?;
        tracing::debug!("Connected to auth database");

        let audit = connect(bootstrap_settings.audit_database_url(), "connect_audit_database").await?;
        tracing::debug!("Connected to audit database");

        Ok(Self { auth, audit })
    }

    pub async fn migrate(&self) -> Result<(), InternalError> {
        migrate_auth_database(&self.auth).await?;
        migrate_audit_database(&self.audit).await?;

        Ok(())
    }
}

async fn connect(url: &str, operation: &str) -> Result<DatabaseConnection, InternalError> {
    Database::connect(url)
        .await
        .map_err(|e| InternalError::database(operation, e))
}

/// Run migrations on the auth database
///
/// Creates users, roles and user_roles and seeds the role catalogue.
///
/// # Arguments
/// * `db` - Database connection to run migrations on
///
/// # Returns
/// * `Ok(())` - Migrations completed successfully
/// * `Err(InternalError)` - Migration failed
pub async fn migrate_auth_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    AuthMigrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Auth database migrations completed");

    Ok(())
}

/// Run migrations on the audit database
///
/// # Arguments
/// * `audit_db` - Database connection to run migrations on
///
/// # Returns
/// * `Ok(())` - Migrations completed successfully
/// * `Err(InternalError)` - Migration failed
pub async fn migrate_audit_database(audit_db: &DatabaseConnection) -> Result<(), InternalError> {
    AuditMigrator::up(audit_db, None)
        .await
        .map_err(|e| InternalError::database("run_audit_migrations", e))?;

    tracing::debug!("Audit database migrations completed");

    Ok(())
}
