//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::profile::Profile;
use crate::domain::user::{Email, User, UserId, Username};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// Insert hit the `users_username_key` unique constraint.
    #[error("username is already registered")]
    DuplicateUsername,
    /// Insert hit the `users_email_key` unique constraint.
    #[error("email is already registered")]
    DuplicateEmail,
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Fields persisted for a new registration. Timestamps and the surrogate id
/// are assigned by the storage layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by surrogate identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by unique username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by unique email address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new user and return the persisted record.
    ///
    /// The storage layer's unique constraints are the authoritative guard
    /// against duplicate registrations; violations surface as
    /// [`UserPersistenceError::DuplicateUsername`] or
    /// [`UserPersistenceError::DuplicateEmail`].
    async fn insert(&self, new_user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Replace the stored profile for `id`, refreshing `updated_at`.
    /// Returns `None` when no such user exists.
    async fn update_profile(
        &self,
        id: UserId,
        profile: &Profile,
    ) -> Result<Option<User>, UserPersistenceError>;
}
