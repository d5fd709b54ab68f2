//! Bcrypt-backed credential hashing adapter.
//!
//! Bcrypt is deliberately slow, so both operations run on the blocking
//! thread pool rather than stalling the async executor.

use async_trait::async_trait;
use bcrypt::BcryptError;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Default cost factor (2^10 rounds) for the adaptive hash.
pub const DEFAULT_COST: u32 = 10;

/// [`PasswordHasher`] implementation backed by the `bcrypt` crate.
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the given cost factor.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

fn map_bcrypt_error(error: &BcryptError) -> PasswordHashError {
    match error {
        BcryptError::InvalidHash(message) | BcryptError::InvalidPrefix(message) => {
            PasswordHashError::malformed_hash(message.clone())
        }
        other => PasswordHashError::hash(other.to_string()),
    }
}

fn join_error(error: &tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|err| join_error(&err))?
            .map_err(|err| map_bcrypt_error(&err))
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(|err| join_error(&err))?
            .map_err(|err| map_bcrypt_error(&err))
    }
}
