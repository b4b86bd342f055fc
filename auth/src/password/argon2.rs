use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;

use super::errors::PasswordError;

/// Longest secret accepted, in bytes.
pub const MAX_SECRET_BYTES: usize = 1024;

/// Hash verified when the real one is missing or unparsable, so that every
/// rejected verification costs one full Argon2 run.
static DECOY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Password hashing implementation.
///
/// Argon2id with the library's default cost parameters and a fresh random
/// salt per hash. Stateless and safe to share between tasks.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret.
    ///
    /// # Arguments
    /// * `secret` - Plaintext secret to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `TooLong` - Secret exceeds `MAX_SECRET_BYTES`
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        if secret.len() > MAX_SECRET_BYTES {
            return Err(PasswordError::TooLong {
                max: MAX_SECRET_BYTES,
                actual: secret.len(),
            });
        }

        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a secret against a stored hash.
    ///
    /// Fail-closed: a mismatch, an over-long secret, a truncated hash or an
    /// unrecognized hash format all return `false`. The final comparison is
    /// the constant-time one from `password-hash`.
    ///
    /// # Arguments
    /// * `secret` - Plaintext secret to verify
    /// * `hash` - Stored hash in PHC string format (may be empty)
    ///
    /// # Returns
    /// True only if the secret matches the hash
    pub fn verify(&self, secret: &str, hash: &str) -> bool {
        if secret.len() > MAX_SECRET_BYTES {
            self.burn_decoy("");
            return false;
        }

        match PasswordHash::new(hash) {
            Ok(parsed) if Algorithm::try_from(parsed.algorithm).is_ok() => {
                Argon2::default()
                    .verify_password(secret.as_bytes(), &parsed)
                    .is_ok()
            }
            // Unparsable, or a PHC string from some other algorithm
            _ => {
                self.burn_decoy(secret);
                false
            }
        }
    }

    fn burn_decoy(&self, secret: &str) {
        let decoy = DECOY_HASH.get_or_init(|| self.hash("decoy-secret-never-matches").ok());

        if let Some(parsed) = decoy.as_deref().and_then(|h| PasswordHash::new(h).ok()) {
            let _ = Argon2::default().verify_password(secret.as_bytes(), &parsed);
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
