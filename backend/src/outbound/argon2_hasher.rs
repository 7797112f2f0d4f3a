//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashing is CPU-bound, so both operations run on tokio's blocking pool.

use argon2::{Algorithm, Argon2, Params, Version};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Argon2id password hasher.
///
/// Verification reads the cost parameters from the stored PHC string, so
/// hashes produced under different parameters keep verifying.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    /// Minimal-cost hasher for tests and local fixtures.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the parameters are within Argon2's bounds.
    pub fn low_cost() -> Result<Self, PasswordHasherError> {
        let params = Params::new(64, 1, 1, None)
            .map_err(|err| PasswordHasherError::backend(err.to_string()))?;
        Ok(Self::with_params(params))
    }
}

fn hash_blocking(params: Params, password: &str) -> Result<PasswordHash, PasswordHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| PasswordHash::new(phc.to_string()))
        .map_err(|err| PasswordHasherError::backend(err.to_string()))
}

fn verify_blocking(password: &str, encoded: &str) -> Result<bool, PasswordHasherError> {
    let parsed = PhcString::new(encoded)
        .map_err(|err| PasswordHasherError::backend(format!("stored hash unreadable: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn map_join_error(error: tokio::task::JoinError) -> PasswordHasherError {
    PasswordHasherError::backend(format!("hashing task aborted: {error}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let password = Zeroizing::new(password.to_owned());
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || hash_blocking(params, &password))
            .await
            .map_err(map_join_error)?
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let password = Zeroizing::new(password.to_owned());
        let encoded = hash.as_ref().to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&password, &encoded))
            .await
            .map_err(map_join_error)?
    }
}
