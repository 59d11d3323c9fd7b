pub mod bootstrap_settings;
pub mod database;
pub mod env_provider;
pub mod errors;
pub mod logging;
pub mod security_settings;

pub use bootstrap_settings::BootstrapSettings;
pub use database::{DatabaseConnections, migrate_audit_database, migrate_auth_database};
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::ApplicationError;
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use security_settings::SecuritySettings;

#[cfg(test)]
pub use env_provider::MockEnvironment;
