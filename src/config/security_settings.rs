use crate::config::env_provider::load_setting;
use crate::config::{ApplicationError, EnvironmentProvider, SystemEnvironment};
use crate::providers::crypto_provider::{DEFAULT_BCRYPT_COST, HashAlgorithm};

/// Failed logins that lock an account unless configured otherwise
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;

/// Password hashing and lockout settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecuritySettings {
    pub lockout_threshold: u32,
    pub hash_algorithm: HashAlgorithm,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            lockout_threshold: DEFAULT_LOCKOUT_THRESHOLD,
            hash_algorithm: HashAlgorithm::default(),
        }
    }
}

impl SecuritySettings {
    /// Load security settings from the given environment
    ///
    /// * `LOCKOUT_THRESHOLD` - failed attempts before locking, at least 1 (default 5)
    /// * `PASSWORD_HASH_ALGORITHM` - `bcrypt` or `argon2id` (default `bcrypt`)
    /// * `BCRYPT_COST` - bcrypt work factor, 4 to 31 (default 12)
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ApplicationError> {
        let threshold_value =
            load_setting(env, "LOCKOUT_THRESHOLD", &DEFAULT_LOCKOUT_THRESHOLD.to_string())?;
        let lockout_threshold: u32 = threshold_value
            .parse()
            .map_err(|e| ApplicationError::parse("LOCKOUT_THRESHOLD", e))?;
        if lockout_threshold == 0 {
            return Err(ApplicationError::invalid(
                "LOCKOUT_THRESHOLD",
                "must be at least 1",
            ));
        }

        let algorithm = load_setting(env, "PASSWORD_HASH_ALGORITHM", "bcrypt")?;
        let hash_algorithm = match algorithm.to_ascii_lowercase().as_str() {
            "bcrypt" => {
                let cost_value = load_setting(env, "BCRYPT_COST", &DEFAULT_BCRYPT_COST.to_string())?;
                let cost: u32 = cost_value
                    .parse()
                    .map_err(|e| ApplicationError::parse("BCRYPT_COST", e))?;
                if !(4..=31).contains(&cost) {
                    return Err(ApplicationError::invalid(
                        "BCRYPT_COST",
                        format!("{} is outside 4..=31", cost),
                    ));
                }
                HashAlgorithm::Bcrypt { cost }
            }
            "argon2id" | "argon2" => HashAlgorithm::Argon2id,
            other => {
                return Err(ApplicationError::invalid(
                    "PASSWORD_HASH_ALGORITHM",
                    format!("unsupported algorithm '{}', expected bcrypt or argon2id", other),
                ));
            }
        };

        Ok(Self {
            lockout_threshold,
            hash_algorithm,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(&SystemEnvironment)
    }
}
