//! A caller-supplied handle replaces the environment as the source of the shared instance.

use db_provider::config::{DB_HOST, DB_LOGIN, DB_NAME, DB_PASSWORD};
use db_provider::{get_connection, install_connection, ConnectionConfig, ConnectionHandle};

fn handle_for(host: &str) -> ConnectionHandle {
    let host = host.to_string();
    let config = ConnectionConfig::from_lookup(|key| match key {
        DB_HOST => Some(host.clone()),
        DB_NAME => Some("fixture".to_string()),
        DB_LOGIN => Some("tester".to_string()),
        DB_PASSWORD => Some("pw".to_string()),
        _ => None,
    })
    .expect("fixture config parses");
    ConnectionHandle::new(config).expect("fixture config validates")
}

#[tokio::test]
async fn installed_handle_is_served_without_reading_the_environment() {
    for var in [DB_HOST, DB_NAME, DB_LOGIN, DB_PASSWORD] {
        std::env::remove_var(var);
    }

    assert!(install_connection(handle_for("fake-db")).is_ok());

    let shared = get_connection().expect("installed handle is returned");
    assert_eq!(shared.config().host, "fake-db");
    assert_eq!(shared.config().database_name, "fixture");

    // A second install is refused and hands the handle back.
    let rejected = install_connection(handle_for("other-db")).unwrap_err();
    assert_eq!(rejected.config().host, "other-db");
    assert_eq!(get_connection().unwrap().config().host, "fake-db");
}
