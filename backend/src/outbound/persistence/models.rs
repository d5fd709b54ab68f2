//! Diesel row structs and their mapping to domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::ports::{NewUser, UserPersistenceError};
use crate::domain::profile::Profile;
use crate::domain::user::{Email, User, UserId, Username};

use super::schema::users;

/// Queryable row for the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable row for new registrations. The id, timestamps, and profile
/// column take their database defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(new_user: &'a NewUser) -> Self {
        Self {
            username: new_user.username.as_ref(),
            email: new_user.email.as_ref(),
            password_hash: new_user.password_hash.as_str(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = UserPersistenceError;

    /// Stored rows already satisfied the domain invariants on the way in;
    /// a row that no longer parses indicates out-of-band tampering and is
    /// reported as a query error rather than a panic.
    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username)
            .map_err(|err| UserPersistenceError::query(format!("corrupt username column: {err}")))?;
        let email = Email::new(row.email)
            .map_err(|err| UserPersistenceError::query(format!("corrupt email column: {err}")))?;
        let profile = row
            .profile
            .map(serde_json::from_value::<Profile>)
            .transpose()
            .map_err(|err| UserPersistenceError::query(format!("corrupt profile column: {err}")))?;

        Ok(User::new(
            UserId::new(row.id),
            username,
            email,
            row.password_hash,
            profile,
            row.created_at,
            row.updated_at,
        ))
    }
}
