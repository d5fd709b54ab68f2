//! In-memory port implementations shared by unit tests.
//!
//! The repository enforces the same uniqueness rules as the PostgreSQL
//! adapter so workflow tests exercise the authoritative duplicate guard.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{NewUser, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::profile::Profile;
use crate::domain::user::{Email, User, UserId, Username};

#[derive(Default)]
struct State {
    users: Vec<User>,
    next_id: i32,
}

/// Mutex-guarded in-memory stand-in for the Diesel repository.
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().expect("state lock");
        Ok(state.users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().expect("state lock");
        Ok(state
            .users
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().expect("state lock");
        Ok(state
            .users
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn insert(&self, new_user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.state.lock().expect("state lock");

        if state
            .users
            .iter()
            .any(|user| user.username() == &new_user.username)
        {
            return Err(UserPersistenceError::DuplicateUsername);
        }
        if state.users.iter().any(|user| user.email() == &new_user.email) {
            return Err(UserPersistenceError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User::new(
            UserId::new(state.next_id),
            new_user.username.clone(),
            new_user.email.clone(),
            new_user.password_hash.clone(),
            None,
            now,
            now,
        );
        state.next_id += 1;
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: UserId,
        profile: &Profile,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.state.lock().expect("state lock");
        let Some(slot) = state.users.iter_mut().find(|user| user.id() == id) else {
            return Ok(None);
        };

        let updated = User::new(
            slot.id(),
            slot.username().clone(),
            slot.email().clone(),
            slot.password_hash().to_owned(),
            Some(profile.clone()),
            slot.created_at(),
            Utc::now(),
        );
        *slot = updated.clone();
        Ok(Some(updated))
    }
}

/// Reversible marker "hash" so tests stay fast and assertable.
pub struct PlainTextHasher;

#[async_trait]
impl PasswordHasher for PlainTextHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain${plaintext}"))
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordHashError> {
        Ok(hash == format!("plain${plaintext}"))
    }
}
