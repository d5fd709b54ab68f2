//! Diesel-backed [`UserRepository`] adapter.
//!
//! Lookups are plain point queries. The insert relies on the table's
//! UNIQUE constraints as the authoritative duplicate guard: a constraint
//! violation is translated back into the same duplicate-identity errors the
//! service's fast-path checks produce, so concurrent registrations lose
//! cleanly instead of surfacing as opaque 500s.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUser, UserPersistenceError, UserRepository};
use crate::domain::profile::Profile;
use crate::domain::user::{Email, User, UserId, Username};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository backed by the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_query_error(error: DieselError) -> UserPersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            UserPersistenceError::connection(info.message().to_owned())
        }
        other => UserPersistenceError::query(other.to_string()),
    }
}

/// Translate a unique-constraint violation into the matching duplicate
/// error. Violations of unrecognised constraints fall through as plain
/// query errors.
fn classify_unique_violation(
    constraint: Option<&str>,
    message: &str,
) -> UserPersistenceError {
    match constraint {
        Some(USERNAME_CONSTRAINT) => UserPersistenceError::DuplicateUsername,
        Some(EMAIL_CONSTRAINT) => UserPersistenceError::DuplicateEmail,
        _ => UserPersistenceError::query(message.to_owned()),
    }
}

fn map_insert_error(error: DieselError) -> UserPersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            classify_unique_violation(info.constraint_name(), info.message())
        }
        other => map_query_error(other),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        users::table
            .find(id.as_i32())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn insert(&self, new_user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(users::table)
            .values(NewUserRow::from(new_user))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(map_insert_error)?;

        User::try_from(row)
    }

    async fn update_profile(
        &self,
        id: UserId,
        profile: &Profile,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let value = serde_json::to_value(profile)
            .map_err(|err| UserPersistenceError::query(format!("profile encoding failed: {err}")))?;

        diesel::update(users::table.find(id.as_i32()))
            .set((
                users::profile.eq(Some(value)),
                users::updated_at.eq(Utc::now()),
            ))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?
            .map(User::try_from)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the error translation helpers; query execution itself is
    //! exercised against a live database out of band.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(USERNAME_CONSTRAINT), UserPersistenceError::DuplicateUsername)]
    #[case(Some(EMAIL_CONSTRAINT), UserPersistenceError::DuplicateEmail)]
    fn known_constraints_map_to_duplicate_errors(
        #[case] constraint: Option<&str>,
        #[case] expected: UserPersistenceError,
    ) {
        assert_eq!(
            classify_unique_violation(constraint, "duplicate key value"),
            expected
        );
    }

    #[rstest]
    #[case(Some("users_pkey"))]
    #[case(None)]
    fn unknown_constraints_fall_through_as_query_errors(#[case] constraint: Option<&str>) {
        let error = classify_unique_violation(constraint, "duplicate key value");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }

    #[test]
    fn pool_failures_map_to_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, UserPersistenceError::connection("timed out"));
    }

    #[test]
    fn closed_connections_map_to_connection_errors() {
        let error = map_query_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("connection closed".to_owned()),
        ));
        assert!(matches!(error, UserPersistenceError::Connection { .. }));
    }

    #[test]
    fn not_found_is_absorbed_by_optional_lookups() {
        // `.optional()` turns DieselError::NotFound into Ok(None); only
        // genuine failures should reach map_query_error.
        let error = map_query_error(DieselError::RollbackTransaction);
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }
}
