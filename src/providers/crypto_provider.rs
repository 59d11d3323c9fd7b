use argon2::password_hash::{PasswordHash as PhcString, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::errors::InternalError;
use crate::types::PasswordHash;

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Hash algorithm used for newly written hashes
///
/// Verification accepts any supported format regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Bcrypt { cost: u32 },
    Argon2id,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Bcrypt {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

/// Password hashing and verification
///
/// Hashes are salted per call with the salt embedded in the output, so only
/// the stored blob is needed to verify. The slow work runs on tokio's
/// blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoProvider {
    algorithm: HashAlgorithm,
}

impl CryptoProvider {
    /// Create a new CryptoProvider
    ///
    /// # Arguments
    /// * `algorithm` - Algorithm and work factor for new hashes
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash a password
    ///
    /// # Returns
    /// * `Ok(PasswordHash)` - bcrypt (`$2b$...`) or argon2 PHC string
    /// * `Err(InternalError::Crypto)` - hasher failed or the blocking task panicked
    pub async fn hash_password(&self, password: &str) -> Result<PasswordHash, InternalError> {
        let algorithm = self.algorithm;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hash_blocking(algorithm, &password))
            .await
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))?
    }

    /// Verify a password against a stored hash
    ///
    /// A malformed or unrecognised hash never errors: it simply does not match.
    pub async fn verify_password(&self, password: &str, hash: &PasswordHash) -> bool {
        let password = password.to_owned();
        let hash = hash.as_str().to_owned();

        match tokio::task::spawn_blocking(move || verify_blocking(&password, &hash)).await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Generate a cryptographically secure random password
    ///
    /// 20 characters with at least one uppercase letter, lowercase letter,
    /// digit and symbol, so the result always satisfies the password policy.
    pub fn generate_secure_password(&self) -> String {
        const PASSWORD_LENGTH: usize = 20;
        const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
        const DIGITS: &[u8] = b"0123456789";
        const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

        let mut rng = rand::rng();
        let mut pick = |set: &[u8]| set[rng.random_range(0..set.len())] as char;

        let mut chars: Vec<char> = vec![pick(UPPER), pick(LOWER), pick(DIGITS), pick(SYMBOLS)];
        let all: Vec<u8> = [UPPER, LOWER, DIGITS, SYMBOLS].concat();
        while chars.len() < PASSWORD_LENGTH {
            chars.push(pick(all.as_slice()));
        }

        chars.shuffle(&mut rand::rng());
        chars.into_iter().collect()
    }
}

fn hash_blocking(algorithm: HashAlgorithm, password: &str) -> Result<PasswordHash, InternalError> {
    match algorithm {
        HashAlgorithm::Bcrypt { cost } => bcrypt::hash(password, cost)
            .map(PasswordHash)
            .map_err(|e| InternalError::crypto("bcrypt_hash", e.to_string())),
        HashAlgorithm::Argon2id => {
            let salt = SaltString::generate(&mut rand_core::OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| PasswordHash(hash.to_string()))
                .map_err(|e| InternalError::crypto("argon2_hash", e.to_string()))
        }
    }
}

fn verify_blocking(password: &str, hash: &str) -> bool {
    if hash.starts_with("$2") {
        bcrypt::verify(password, hash).unwrap_or(false)
    } else if hash.starts_with("$argon2") {
        match PhcString::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    } else {
        false
    }
}
