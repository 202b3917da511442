//! Environment-configured MySQL connection provider.
//!
//! Reads `DB_NAME`, `DB_LOGIN`, `DB_PASSWORD` and `DB_HOST`, fixes the dialect to
//! MySQL-compatible and the session time zone to the local offset, and hands out one shared
//! [`ConnectionHandle`](db::ConnectionHandle).
//!
//! ```no_run
//! # async fn run() -> db_provider::error::Result<()> {
//! let handle = db_provider::get_connection()?;
//! handle.ping().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;

pub use config::{ConnectionConfig, Dialect, PoolSettings, TimezoneMode};
pub use db::{get_connection, install_connection, ConnectionHandle, ServerClock};
pub use error::{AppError, Result};
