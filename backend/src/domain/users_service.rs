//! Account service: registration, lookup, credential verification, and
//! profile updates.
//!
//! Orchestrates the [`UserRepository`] and [`PasswordHasher`] ports and maps
//! their failures onto the transport-agnostic [`Error`] taxonomy.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::ports::{NewUser, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::profile::ProfileUpdate;
use crate::domain::user::{Email, Password, User, UserId, Username};
use crate::domain::Error;

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: Username,
    pub email: Email,
    pub password: Password,
}

/// Application service for user accounts.
#[derive(Clone)]
pub struct UsersService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UsersService {
    /// Assemble the service from its ports.
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new account.
    ///
    /// The username and email lookups are a fast path producing friendly
    /// errors; the storage layer's unique constraints remain the
    /// authoritative guard, so a concurrent duplicate that slips past the
    /// lookups still surfaces as the same conflict from the insert.
    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        if self
            .repository
            .find_by_username(&registration.username)
            .await
            .map_err(map_persistence_error)?
            .is_some()
        {
            return Err(duplicate_username());
        }

        if self
            .repository
            .find_by_email(&registration.email)
            .await
            .map_err(map_persistence_error)?
            .is_some()
        {
            return Err(duplicate_email());
        }

        let password_hash = self
            .hasher
            .hash(registration.password.expose())
            .await
            .map_err(map_hash_error)?;

        let new_user = NewUser {
            username: registration.username,
            email: registration.email,
            password_hash,
        };

        let user = self
            .repository
            .insert(&new_user)
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user.id(), username = %user.username(), "user registered");
        Ok(user)
    }

    /// Fetch an account by identifier.
    pub async fn get(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| unknown_user(id))
    }

    /// Merge a validated profile patch into the stored profile.
    ///
    /// Fields absent from the patch are left unchanged; the storage layer
    /// refreshes `updated_at` as part of the same write.
    pub async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<User, Error> {
        let user = self.get(id).await?;

        let mut profile = user.profile().cloned().unwrap_or_default();
        profile.apply(&update);

        self.repository
            .update_profile(id, &profile)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| unknown_user(id))
    }

    /// Check a plaintext password against the account's stored hash.
    pub async fn verify_password(&self, password: &Password, user: &User) -> Result<bool, Error> {
        self.hasher
            .verify(password.expose(), user.password_hash())
            .await
            .map_err(map_hash_error)
    }
}

fn duplicate_username() -> Error {
    Error::conflict("username is already registered")
        .with_details(json!({ "field": "username", "code": "duplicate_username" }))
}

fn duplicate_email() -> Error {
    Error::conflict("email is already registered")
        .with_details(json!({ "field": "email", "code": "duplicate_email" }))
}

fn unknown_user(id: UserId) -> Error {
    Error::not_found(format!("no user with id {id}"))
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateUsername => duplicate_username(),
        UserPersistenceError::DuplicateEmail => duplicate_email(),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

#[cfg(test)]
mod tests {
    //! Workflow coverage against the in-memory port implementations.

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::profile::{Gender, ProfileUpdate};
    use crate::test_support::{InMemoryUserRepository, PlainTextHasher};
    use async_trait::async_trait;
    use rstest::rstest;

    fn service() -> UsersService {
        UsersService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(PlainTextHasher),
        )
    }

    fn registration(username: &str, email: &str, password: &str) -> Registration {
        Registration {
            username: Username::new(username).expect("valid username"),
            email: Email::new(email).expect("valid email"),
            password: Password::new(password).expect("valid password"),
        }
    }

    fn patch(
        height: Option<f64>,
        weight: Option<f64>,
        age: Option<f64>,
        gender: Option<&str>,
    ) -> ProfileUpdate {
        ProfileUpdate::from_parts(height, weight, age, gender).expect("valid patch")
    }

    #[tokio::test]
    async fn register_assigns_id_and_leaves_profile_absent() {
        let service = service();

        let user = service
            .register(registration("alice", "alice@x.com", "Secret123"))
            .await
            .expect("registration should succeed");

        assert_eq!(user.id().as_i32(), 1);
        assert_eq!(user.username().as_ref(), "alice");
        assert_eq!(user.email().as_ref(), "alice@x.com");
        assert!(user.profile().is_none());
    }

    #[tokio::test]
    async fn register_stores_a_hash_not_the_plaintext() {
        let service = service();

        let user = service
            .register(registration("alice", "alice@x.com", "Secret123"))
            .await
            .expect("registration should succeed");

        assert_ne!(user.password_hash(), "Secret123");
        let password = Password::new("Secret123").expect("valid password");
        assert!(
            service
                .verify_password(&password, &user)
                .await
                .expect("verification should not error")
        );
        let wrong = Password::new("Other123").expect("valid password");
        assert!(
            !service
                .verify_password(&wrong, &user)
                .await
                .expect("verification should not error")
        );
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_regardless_of_email() {
        let service = service();
        service
            .register(registration("alice", "alice@x.com", "Secret123"))
            .await
            .expect("first registration should succeed");

        let err = service
            .register(registration("alice", "bob@x.com", "Other123"))
            .await
            .expect_err("duplicate username must fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(
            err.details().and_then(|d| d.get("field")),
            Some(&serde_json::json!("username"))
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_regardless_of_username() {
        let service = service();
        service
            .register(registration("alice", "alice@x.com", "Secret123"))
            .await
            .expect("first registration should succeed");

        let err = service
            .register(registration("bob", "alice@x.com", "Other123"))
            .await
            .expect_err("duplicate email must fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(
            err.details().and_then(|d| d.get("field")),
            Some(&serde_json::json!("email"))
        );
    }

    #[tokio::test]
    async fn concurrent_duplicate_registrations_yield_exactly_one_success() {
        let service = service();

        let (first, second) = tokio::join!(
            service.register(registration("alice", "alice@x.com", "Secret123")),
            service.register(registration("alice", "bob@x.com", "Other123")),
        );

        // The storage-level uniqueness guard decides the winner; arrival
        // order must not matter.
        assert!(first.is_ok() != second.is_ok());
        let err = first.err().or(second.err()).expect("one attempt must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn update_profile_merges_supplied_fields_only() {
        let service = service();
        let user = service
            .register(registration("alice", "alice@x.com", "Secret123"))
            .await
            .expect("registration should succeed");

        let updated = service
            .update_profile(user.id(), patch(Some(170.0), Some(60.0), None, Some("female")))
            .await
            .expect("update should succeed");
        let profile = updated.profile().expect("profile present");
        assert_eq!(profile.height, Some(170.0));
        assert_eq!(profile.weight, Some(60.0));
        assert_eq!(profile.gender, Some(Gender::Female));
        assert_eq!(profile.age, None);

        let updated = service
            .update_profile(user.id(), patch(None, None, Some(30.0), None))
            .await
            .expect("second update should succeed");
        let profile = updated.profile().expect("profile present");
        assert_eq!(profile.height, Some(170.0), "height survives later patches");
        assert_eq!(profile.age, Some(30));
    }

    #[tokio::test]
    async fn update_profile_refreshes_the_update_timestamp() {
        let service = service();
        let user = service
            .register(registration("alice", "alice@x.com", "Secret123"))
            .await
            .expect("registration should succeed");

        let updated = service
            .update_profile(user.id(), patch(Some(180.0), None, None, None))
            .await
            .expect("update should succeed");

        assert!(updated.updated_at() >= user.updated_at());
        assert_eq!(updated.created_at(), user.created_at());
    }

    #[tokio::test]
    async fn update_profile_for_unknown_user_is_not_found() {
        let service = service();

        let err = service
            .update_profile(UserId::new(42), patch(Some(180.0), None, None, None))
            .await
            .expect_err("unknown user must fail");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn get_returns_not_found_for_unknown_id() {
        let err = service()
            .get(UserId::new(7))
            .await
            .expect_err("unknown user must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[derive(Clone, Copy)]
    enum StubFailure {
        Connection,
        Query,
    }

    struct FailingRepository {
        failure: StubFailure,
    }

    impl FailingRepository {
        fn error(&self) -> UserPersistenceError {
            match self.failure {
                StubFailure::Connection => {
                    UserPersistenceError::connection("database unavailable")
                }
                StubFailure::Query => UserPersistenceError::query("database query failed"),
            }
        }
    }

    #[async_trait]
    impl UserRepository for FailingRepository {
        async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, UserPersistenceError> {
            Err(self.error())
        }

        async fn find_by_username(
            &self,
            _username: &Username,
        ) -> Result<Option<User>, UserPersistenceError> {
            Err(self.error())
        }

        async fn find_by_email(
            &self,
            _email: &Email,
        ) -> Result<Option<User>, UserPersistenceError> {
            Err(self.error())
        }

        async fn insert(&self, _new_user: &NewUser) -> Result<User, UserPersistenceError> {
            Err(self.error())
        }

        async fn update_profile(
            &self,
            _id: UserId,
            _profile: &crate::domain::profile::Profile,
        ) -> Result<Option<User>, UserPersistenceError> {
            Err(self.error())
        }
    }

    #[rstest]
    #[case(StubFailure::Connection, ErrorCode::ServiceUnavailable)]
    #[case(StubFailure::Query, ErrorCode::InternalError)]
    #[tokio::test]
    async fn persistence_failures_map_to_domain_errors(
        #[case] failure: StubFailure,
        #[case] expected: ErrorCode,
    ) {
        let service = UsersService::new(
            Arc::new(FailingRepository { failure }),
            Arc::new(PlainTextHasher),
        );

        let err = service
            .register(registration("alice", "alice@x.com", "Secret123"))
            .await
            .expect_err("repository failures should surface as domain errors");

        assert_eq!(err.code(), expected);
    }
}
