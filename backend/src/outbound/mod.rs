//! Outbound adapters implementing domain ports against real dependencies.

pub mod password;
pub mod persistence;
