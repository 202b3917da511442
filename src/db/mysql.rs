//! Provides the MySQL connection handle built on `sqlx`.
//!
//! A [`ConnectionHandle`] pairs an immutable [`ConnectionConfig`] with a lazily-connecting pool.
//! Building one validates the configuration but opens no socket; the first query does.
//! Also contains live-server tests (requires the `integration-tests` feature).

use crate::config::ConnectionConfig;
use crate::error::{AppError, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{MySqlPool, Row};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// What the server reports about its clock for this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerClock {
    /// `NOW()` as seen by the server, in the session time zone.
    pub server_now: NaiveDateTime,
    /// The value of `@@session.time_zone`.
    pub session_time_zone: String,
}

/// A configured, not necessarily connected, MySQL client.
///
/// Cheap to clone; clones share the same pool.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    config: ConnectionConfig,
    pool: MySqlPool,
}

impl ConnectionHandle {
    /// Validates `config` and builds a lazily-connecting pool for it.
    ///
    /// The pool spawns its reaper task on the current Tokio runtime, so one must be running.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingConfig` or `AppError::InvalidConfig` if `config` does not validate,
    /// and `AppError::NoRuntime` when called outside a Tokio runtime.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        config.validate().map_err(|e| {
            error!("Refusing to build connection handle: {}", e);
            e
        })?;

        if tokio::runtime::Handle::try_current().is_err() {
            error!("Refusing to build connection handle outside a Tokio runtime");
            return Err(AppError::NoRuntime);
        }

        let pool = config
            .pool
            .pool_options()
            .connect_lazy_with(config.connect_options());

        info!(
            "Configured {} handle for {}@{}:{}/{} (timezone: {})",
            config.dialect,
            config.username,
            config.host,
            config.port,
            config.database_name,
            config.timezone_mode
        );
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The underlying pool, for data-access code that issues its own queries.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Runs `SELECT 1` and returns the round-trip time.
    ///
    /// This is the first point at which an unreachable host or rejected login surfaces.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if a connection cannot be acquired or the query fails.
    pub async fn ping(&self) -> Result<Duration> {
        debug!("Pinging {}:{}", self.config.host, self.config.port);
        let started = Instant::now();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Ping to {} failed: {}", self.config.host, e);
                AppError::Db(e.into())
            })?;

        let elapsed = started.elapsed();
        info!("Ping to {} succeeded in {:?}", self.config.host, elapsed);
        Ok(elapsed)
    }

    /// Reads the server's current time and the session time zone applied on connect.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails or the columns cannot be decoded.
    pub async fn server_clock(&self) -> Result<ServerClock> {
        let row = sqlx::query("SELECT NOW(), CAST(@@session.time_zone AS CHAR)")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to read server clock: {}", e);
                AppError::Db(e.into())
            })?;

        let clock = ServerClock {
            server_now: row.try_get::<NaiveDateTime, _>(0)?,
            session_time_zone: row.try_get::<String, _>(1)?,
        };
        debug!("Server clock: {:?}", clock);
        Ok(clock)
    }

    /// Closes every pooled connection. Later queries on this handle fail.
    pub async fn close(&self) {
        info!("Closing connection pool for {}", self.config.host);
        self.pool.close().await;
    }
}
