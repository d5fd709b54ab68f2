//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; no business logic lives here. Row structs (`models.rs`) and the
//! table definition (`schema.rs`) are internal implementation details, never
//! exposed to the domain layer. Connections come from a `bb8` pool with
//! native async support through `diesel-async`, and all database errors map
//! to domain persistence error types.

mod diesel_user_repository;
mod migrate;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrate::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
