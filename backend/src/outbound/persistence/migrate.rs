//! Embedded schema migrations, applied at startup.
//!
//! Diesel's migration harness is synchronous, so the run is pushed onto the
//! blocking thread pool. The `users` table's UNIQUE constraints, the
//! authoritative duplicate-registration guard, are created here.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures while bringing the schema up to date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be established.
    #[error("migration connection failed: {message}")]
    Connection { message: String },
    /// A migration failed to apply.
    #[error("schema migration failed: {message}")]
    Migration { message: String },
}

/// Apply any pending migrations against `database_url`.
pub async fn run_pending_migrations(database_url: String) -> Result<(), MigrationError> {
    tokio::task::spawn_blocking(move || {
        let mut conn =
            PgConnection::establish(&database_url).map_err(|err| MigrationError::Connection {
                message: err.to_string(),
            })?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Migration {
                message: err.to_string(),
            })?;

        if !applied.is_empty() {
            info!(count = applied.len(), "applied pending schema migrations");
        }
        Ok(())
    })
    .await
    .map_err(|err| MigrationError::Migration {
        message: format!("migration task failed: {err}"),
    })?
}
