//! Domain ports: narrow interfaces the service layer depends on.
//!
//! Concrete adapters live in `outbound`; tests substitute in-memory
//! implementations.

mod password_hasher;
mod user_repository;

pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use user_repository::{NewUser, UserPersistenceError, UserRepository};
