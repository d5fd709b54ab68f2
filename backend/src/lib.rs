//! Account service for the what-to-eat application.
//!
//! Layers: `domain` holds entities, validation, and workflows; `inbound`
//! adapts HTTP onto the domain; `outbound` implements the domain ports
//! against PostgreSQL and bcrypt; `server` wires everything together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

/// Request tracing middleware, re-exported for app wiring.
pub use middleware::trace::Trace;
