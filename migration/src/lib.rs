pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_and_roles;
mod m20250301_000002_seed_roles;
mod m20250301_000003_create_activity_log;

/// Migrations for the credential database (principals, roles, assignments)
pub struct AuthMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AuthMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_and_roles::Migration),
            Box::new(m20250301_000002_seed_roles::Migration),
        ]
    }
}

/// Migrations for the activity log database
///
/// Kept separate so the audit trail can live in its own database.
pub struct AuditMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AuditMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000003_create_activity_log::Migration),
        ]
    }
}
