//! Tests against a live DynamoDB endpoint.
//!
//! Configuration comes from the environment (`AWS_ACCESS_KEY_ID`,
//! `AWS_SECRET_ACCESS_KEY`, `DYNAMODB_ENDPOINT`, ...). Point
//! `DYNAMODB_ENDPOINT` at a local emulator to avoid touching real tables.
//! The tests are `#[ignore]`d so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p rustdyn-integration -- --ignored
//! ```

use std::sync::Once;
use std::time::Duration;

use rustdyn_client::Client;
use rustdyn_client::options::{CreateTableOptions, WaitOptions};
use rustdyn_core::ClientConfig;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Create a client from the environment.
#[must_use]
pub fn client() -> Client {
    init_tracing();
    let config = ClientConfig::from_env()
        .unwrap_or_else(|e| panic!("failed to load configuration from the environment: {e}"));
    Client::new(config).unwrap_or_else(|e| panic!("failed to create client: {e}"))
}

/// Generate a unique table name for a test.
#[must_use]
pub fn test_table_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Polling suited to emulators as well as the real service.
#[must_use]
pub fn wait_options() -> WaitOptions {
    WaitOptions {
        interval: Duration::from_millis(500),
        max_polls: 240,
    }
}

/// Create a table and wait until it is active. Caller is responsible for
/// cleanup.
pub async fn create_test_table(
    client: &Client,
    prefix: &str,
    options: CreateTableOptions,
) -> String {
    let name = test_table_name(prefix);
    client
        .create_table(&name, options)
        .await
        .unwrap_or_else(|e| panic!("failed to create table {name}: {e}"));
    client
        .wait_for_table_active(&name, wait_options())
        .await
        .unwrap_or_else(|e| panic!("table {name} never became active: {e}"));
    name
}

/// Delete a table, ignoring errors.
pub async fn cleanup_table(client: &Client, name: &str) {
    if client.delete_table(name).await.is_ok() {
        let _ = client.wait_for_table_deleted(name, wait_options()).await;
    }
}

mod test_batch;
mod test_items;
mod test_tables;
