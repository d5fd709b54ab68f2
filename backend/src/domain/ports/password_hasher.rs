//! Port abstraction for the credential hashing adapter.

use async_trait::async_trait;

/// Failures raised by credential hashing adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hashing primitive itself failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// A stored hash could not be parsed during verification. A plain
    /// mismatch is not an error; it is `Ok(false)`.
    #[error("stored password hash is malformed: {message}")]
    MalformedHash { message: String },
}

impl PasswordHashError {
    /// Create a hashing error with the given message.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }

    /// Create a malformed-hash error with the given message.
    pub fn malformed_hash(message: impl Into<String>) -> Self {
        Self::MalformedHash {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// One-way transform of a plaintext password into a salted hash.
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash. Returns
    /// `Ok(false)` on mismatch; errs only for malformed hash input.
    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
