#[cfg(test)]
use std::collections::HashMap;

use crate::config::ApplicationError;

/// Source of environment variables
///
/// Settings read through this trait so tests can supply values without
/// touching the process environment.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production environment provider that reads from system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Read a setting, falling back to `default` when unset
///
/// A variable that is set but blank is rejected rather than defaulted.
pub fn load_setting(
    env: &dyn EnvironmentProvider,
    name: &str,
    default: &str,
) -> Result<String, ApplicationError> {
    match env.get_var(name) {
        None => Ok(default.to_string()),
        Some(value) if value.trim().is_empty() => {
            Err(ApplicationError::invalid(name, "value must not be empty"))
        }
        Some(value) => Ok(value.trim().to_string()),
    }
}

/// Test environment provider with configurable variables
#[cfg(test)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_environment_provider() {
        let provider = MockEnvironment::empty()
            .with_var("DATABASE_URL", "sqlite::memory:")
            .with_var("LOG_LEVEL", "debug");

        assert_eq!(provider.get_var("DATABASE_URL"), Some("sqlite::memory:".to_string()));
        assert_eq!(provider.get_var("LOG_LEVEL"), Some("debug".to_string()));
        assert_eq!(provider.get_var("NON_EXISTENT"), None);
    }

    #[test]
    fn test_mock_environment_from_map() {
        let provider = MockEnvironment::new(HashMap::from([(
            "LOCKOUT_THRESHOLD".to_string(),
            "3".to_string(),
        )]));

        assert_eq!(provider.get_var("LOCKOUT_THRESHOLD"), Some("3".to_string()));
    }

    #[test]
    fn test_load_setting_defaults_when_unset() {
        let env = MockEnvironment::empty();
        assert_eq!(load_setting(&env, "BCRYPT_COST", "12").unwrap(), "12");
    }

    #[test]
    fn test_load_setting_trims_value() {
        let env = MockEnvironment::empty().with_var("BCRYPT_COST", " 10 ");
        assert_eq!(load_setting(&env, "BCRYPT_COST", "12").unwrap(), "10");
    }

    #[test]
    fn test_load_setting_rejects_blank() {
        let env = MockEnvironment::empty().with_var("DATABASE_URL", "   ");
        let err = load_setting(&env, "DATABASE_URL", "sqlite://auth.db?mode=rwc").unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
