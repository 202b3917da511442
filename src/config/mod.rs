//! Loads and validates the connection configuration.
//!
//! Every connection-related environment read goes through [`ConnectionConfig::from_lookup`],
//! so callers and tests can supply values without touching the process environment.

mod connection;

pub use connection::*;
