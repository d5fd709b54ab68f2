//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain service and remain testable without I/O.

use std::sync::Arc;

use crate::domain::UsersService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<UsersService>,
}

impl HttpState {
    /// Wrap the account service for handler injection.
    pub fn new(users: UsersService) -> Self {
        Self {
            users: Arc::new(users),
        }
    }
}
