use std::fmt;

use crate::config::env_provider::load_setting;
use crate::config::{ApplicationError, EnvironmentProvider, SystemEnvironment};

/// Bootstrap settings for infrastructure configuration
pub struct BootstrapSettings {
    database_url: String,
    audit_database_url: String,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment
    ///
    /// * `DATABASE_URL` - credential store (default `sqlite://auth.db?mode=rwc`)
    /// * `AUDIT_DATABASE_URL` - activity log (default `sqlite://audit.db?mode=rwc`)
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ApplicationError> {
        let database_url = load_setting(env, "DATABASE_URL", "sqlite://auth.db?mode=rwc")?;
        let audit_database_url =
            load_setting(env, "AUDIT_DATABASE_URL", "sqlite://audit.db?mode=rwc")?;

        Ok(Self {
            database_url,
            audit_database_url,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn audit_database_url(&self) -> &str {
        &self.audit_database_url
    }
}

/// Connection strings can carry credentials; only the scheme is shown
fn redact_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, _)) => format!("{}://<redacted>", scheme),
        None => "<redacted>".to_string(),
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &redact_url(&self.database_url))
            .field("audit_database_url", &redact_url(&self.audit_database_url))
            .finish()
    }
}
