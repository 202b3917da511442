//! Provides the MySQL connection handle and its process-wide accessor.

mod mysql;
mod provider;

pub use mysql::*;
pub use provider::*;
