//! The typed connection descriptor and its environment loader.
//!
//! Credentials come from `DB_NAME`, `DB_LOGIN`, `DB_PASSWORD` and `DB_HOST`. The dialect and
//! timezone mode are fixed. Port and pool sizing are optional and fall back to defaults.

use crate::error::{AppError, Result};
use chrono::{Local, Offset};
use serde::{Serialize, Serializer};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the target database name.
pub const DB_NAME: &str = "DB_NAME";
/// Environment variable holding the login user.
pub const DB_LOGIN: &str = "DB_LOGIN";
/// Environment variable holding the login secret.
pub const DB_PASSWORD: &str = "DB_PASSWORD";
/// Environment variable holding the server host.
pub const DB_HOST: &str = "DB_HOST";

/// Environment variable holding the server port (optional).
pub const DB_PORT: &str = "DB_PORT";
/// Environment variable capping the pool size (optional).
pub const DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
/// Environment variable setting how many idle connections the pool keeps (optional).
pub const DB_MIN_CONNECTIONS: &str = "DB_MIN_CONNECTIONS";
/// Environment variable bounding the wait for a pooled connection, in seconds (optional).
pub const DB_ACQUIRE_TIMEOUT_SECS: &str = "DB_ACQUIRE_TIMEOUT_SECS";
/// Environment variable bounding how long an idle connection is kept, in seconds (optional).
pub const DB_IDLE_TIMEOUT_SECS: &str = "DB_IDLE_TIMEOUT_SECS";

/// Default MySQL server port.
pub const DEFAULT_PORT: u16 = 3306;

const REDACTED: &str = "********";

/// SQL dialect spoken by the handle. Only MySQL-compatible servers are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Dialect {
    #[default]
    #[serde(rename = "mysql-compatible")]
    MySqlCompatible,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::MySqlCompatible => "mysql-compatible",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the session interprets date/time values.
///
/// `Local` pins the MySQL session `time_zone` to the UTC offset of the host running
/// this process, so `DATETIME` values read and written through the handle are in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimezoneMode {
    #[default]
    #[serde(rename = "local")]
    Local,
}

impl TimezoneMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimezoneMode::Local => "local",
        }
    }

    /// The offset to send as the session `time_zone`, e.g. `+02:00`.
    ///
    /// Sampled when called; a daylight-saving switch after the handle is built is not picked up.
    pub fn session_offset(&self) -> String {
        match self {
            TimezoneMode::Local => {
                let seconds = Local::now().offset().fix().local_minus_utc();
                format_utc_offset(seconds)
            },
        }
    }
}

impl fmt::Display for TimezoneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats an offset in seconds east of UTC as `+HH:MM` / `-HH:MM`.
pub fn format_utc_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

/// Pool sizing and timeouts. Absent variables fall back to [`PoolSettings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PoolSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Builds `sqlx` pool options from these settings.
    pub fn pool_options(&self) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout())
            .idle_timeout(self.idle_timeout())
    }
}

/// Immutable connection descriptor.
///
/// Built once from the environment and never mutated. `Debug` and `Serialize` both redact
/// the password.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionConfig {
    #[serde(rename = "database")]
    pub database_name: String,
    pub username: String,
    #[serde(serialize_with = "serialize_redacted")]
    pub password: String,
    pub host: String,
    pub port: u16,
    pub dialect: Dialect,
    #[serde(rename = "timezoneMode")]
    pub timezone_mode: TimezoneMode,
    pub pool: PoolSettings,
}

impl ConnectionConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Missing credential variables yield empty fields rather than an error; call
    /// [`ConnectionConfig::validate`] to fail fast. Malformed optional values are rejected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| {
            lookup(var).unwrap_or_else(|| {
                debug!("{} is not set, leaving it empty", var);
                String::new()
            })
        };

        let config = Self {
            database_name: required(DB_NAME),
            username: required(DB_LOGIN),
            password: required(DB_PASSWORD),
            host: required(DB_HOST),
            port: parse_optional(&lookup, DB_PORT, DEFAULT_PORT)?,
            dialect: Dialect::MySqlCompatible,
            timezone_mode: TimezoneMode::Local,
            pool: PoolSettings {
                max_connections: parse_optional(
                    &lookup,
                    DB_MAX_CONNECTIONS,
                    PoolSettings::default().max_connections,
                )?,
                min_connections: parse_optional(
                    &lookup,
                    DB_MIN_CONNECTIONS,
                    PoolSettings::default().min_connections,
                )?,
                acquire_timeout_secs: parse_optional(
                    &lookup,
                    DB_ACQUIRE_TIMEOUT_SECS,
                    PoolSettings::default().acquire_timeout_secs,
                )?,
                idle_timeout_secs: parse_optional(
                    &lookup,
                    DB_IDLE_TIMEOUT_SECS,
                    PoolSettings::default().idle_timeout_secs,
                )?,
            },
        };

        debug!(
            "Loaded connection config for {}@{}:{}/{}",
            config.username, config.host, config.port, config.database_name
        );
        Ok(config)
    }

    /// Checks that the database, login and host are present and the pool settings are consistent.
    ///
    /// An empty password is accepted: MySQL accounts may have none.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingConfig` naming the first empty variable, checked in the
    /// order `DB_NAME`, `DB_LOGIN`, `DB_HOST`, or `AppError::InvalidConfig`
    /// when the pool cannot hold any connection or its minimum exceeds its maximum.
    pub fn validate(&self) -> Result<()> {
        let credentials = [
            (DB_NAME, &self.database_name),
            (DB_LOGIN, &self.username),
            (DB_HOST, &self.host),
        ];
        if let Some((var, _)) = credentials.into_iter().find(|(_, value)| value.is_empty()) {
            warn!("Connection config is missing {}", var);
            return Err(AppError::MissingConfig(var));
        }

        if self.pool.max_connections == 0 {
            return Err(AppError::InvalidConfig {
                var: DB_MAX_CONNECTIONS,
                value: self.pool.max_connections.to_string(),
                reason: "pool must allow at least one connection".to_string(),
            });
        }
        if self.pool.min_connections > self.pool.max_connections {
            return Err(AppError::InvalidConfig {
                var: DB_MIN_CONNECTIONS,
                value: self.pool.min_connections.to_string(),
                reason: format!(
                    "exceeds {}={}",
                    DB_MAX_CONNECTIONS, self.pool.max_connections
                ),
            });
        }

        Ok(())
    }

    /// Translates this descriptor into `sqlx` connect options, including the session time zone.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database_name)
            .timezone(Some(self.timezone_mode.session_offset()))
    }

    /// The password as it should appear in any human-facing output.
    pub fn redacted_password(&self) -> &'static str {
        if self.password.is_empty() {
            ""
        } else {
            REDACTED
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("database_name", &self.database_name)
            .field("username", &self.username)
            .field("password", &self.redacted_password())
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dialect", &self.dialect)
            .field("timezone_mode", &self.timezone_mode)
            .field("pool", &self.pool)
            .finish()
    }
}

fn serialize_redacted<S>(password: &str, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if password.is_empty() { "" } else { REDACTED })
}

/// Parses an optional variable, treating absent or blank values as `default`.
fn parse_optional<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(var) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map_err(|e| AppError::InvalidConfig {
                    var,
                    value: raw.clone(),
                    reason: e.to_string(),
                })
        },
        _ => Ok(default),
    }
}
