//! Process-wide access to a single shared [`ConnectionHandle`].
//!
//! Code that can take the handle by parameter should do so; this accessor exists for call
//! sites that cannot.

use crate::config::ConnectionConfig;
use crate::db::ConnectionHandle;
use crate::error::Result;
use std::sync::OnceLock;
use tracing::{debug, info};

static CONNECTION: OnceLock<ConnectionHandle> = OnceLock::new();

/// Returns the shared handle, building it from the environment on first call.
///
/// Every successful call returns the same instance. The environment is read once; later
/// changes to it have no effect. A failed first call leaves the slot empty, so a later call
/// retries with whatever the environment holds then.
///
/// The first successful call must happen inside a Tokio runtime.
///
/// # Errors
///
/// Returns `AppError::MissingConfig` or `AppError::InvalidConfig` when the environment
/// does not describe a usable connection, and `AppError::NoRuntime` when the handle would be
/// built outside a Tokio runtime.
pub fn get_connection() -> Result<&'static ConnectionHandle> {
    if let Some(handle) = CONNECTION.get() {
        return Ok(handle);
    }

    debug!("Initializing shared connection handle from environment");
    let handle = ConnectionHandle::new(ConnectionConfig::from_env()?)?;

    // A concurrent caller may have won the race; its handle is kept and ours dropped.
    let shared = CONNECTION.get_or_init(|| handle);
    info!("Shared connection handle ready");
    Ok(shared)
}

/// Installs `handle` as the shared instance instead of reading the environment.
///
/// Hands the handle back if one is already installed.
pub fn install_connection(handle: ConnectionHandle) -> std::result::Result<(), ConnectionHandle> {
    CONNECTION.set(handle)?;
    info!("Installed caller-supplied shared connection handle");
    Ok(())
}
