//! Building the shared handle outside a Tokio runtime is reported, not a panic.

use db_provider::config::{DB_HOST, DB_LOGIN, DB_NAME, DB_PASSWORD};
use db_provider::{get_connection, AppError};

#[test]
fn shared_handle_outside_a_runtime_is_an_error() {
    std::env::set_var(DB_HOST, "localhost");
    std::env::set_var(DB_NAME, "test");
    std::env::set_var(DB_LOGIN, "u");
    std::env::set_var(DB_PASSWORD, "p");

    assert!(matches!(get_connection(), Err(AppError::NoRuntime)));

    // The slot stays empty, so a later call from inside a runtime succeeds.
    let runtime = tokio::runtime::Runtime::new().expect("runtime builds");
    let host = runtime.block_on(async { get_connection().map(|handle| handle.config().host.clone()) });
    assert_eq!(host.expect("handle builds inside the runtime"), "localhost");
}
