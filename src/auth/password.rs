//! Argon2id password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::{debug, error, instrument};

use super::AuthError;

#[derive(Debug, Clone)]
pub struct PasswordHashing {
    params: Params,
}

impl PasswordHashing {
    /// `memory_kib` and `iterations` feed the Argon2id cost parameters.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self { params })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    #[instrument(name = "password::hash", skip_all, err(Display))]
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::Hashing("password cannot be empty".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        self.hasher()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "Argon2 password hashing failed");
                AuthError::Hashing(e.to_string())
            })
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    #[instrument(name = "password::verify", skip_all, err(Display))]
    pub fn verify(&self, stored_hash: &str, password: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            error!(error = %e, "Stored password hash is not a valid PHC string");
            AuthError::Hashing(e.to_string())
        })?;

        // Cost parameters come from the stored hash, not from self
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password mismatch");
                Ok(false)
            }
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}
