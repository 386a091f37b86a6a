//! Common test utilities for odbcbridge-rs integration tests.
//!
//! Every test starts its own in-process `httpmock` server standing in for the
//! query service, so nothing is read from the environment and tests can run
//! in parallel.
//!
//! ```bash
//! # Run the end-to-end tests with driver logging
//! RUST_LOG=odbcbridge_rs=debug cargo test --test bridge_tests -- --nocapture
//! ```

#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use odbcbridge_rs::{Connection, Driver};
use serde_json::{json, Value};
use std::sync::Once;

// ============================================================================
// Constants
// ============================================================================

/// Database name used in every test URL.
pub const DATABASE: &str = "test_db";

pub const USER: &str = "aUser";

pub const PASSWORD: &str = "aPassword";

/// Number of rows in the sample `Customers` table.
pub const CUSTOMER_COUNT: usize = 5;

// ============================================================================
// Logging
// ============================================================================

static LOGGING: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Honors `RUST_LOG`; output is captured by the test harness.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// URLs
// ============================================================================

/// Driver URL pointing at a mock server.
pub fn url_for(server: &MockServer) -> String {
    format!(
        "jdbc:odbcbridge://127.0.0.1:{};databaseName={};user={};password={};useSsl=false;",
        server.port(),
        DATABASE,
        USER,
        PASSWORD
    )
}

/// Service path of a route under the test database.
pub fn route(name: &str) -> String {
    format!("/v1/{}/{}", DATABASE, name)
}

// ============================================================================
// Canned responses
// ============================================================================

/// Query response for the sample `Customers` table.
///
/// Rows carry `LastName` = `LName{i}` and `FirstName` = `FName{i}`.
pub fn customers_body() -> Value {
    let results: Vec<Value> = (0..CUSTOMER_COUNT)
        .map(|i| json!({ "LastName": format!("LName{}", i), "FirstName": format!("FName{}", i) }))
        .collect();

    json!({
        "schema": [
            { "columnName": "LastName", "dataType": "string", "allowDBNull": false, "columnSize": 50 },
            { "columnName": "FirstName", "dataType": "string", "allowDBNull": true, "columnSize": 50 }
        ],
        "results": results
    })
}

// ============================================================================
// Mock helpers
// ============================================================================

/// Answer the health route with 200.
pub fn mock_health(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path(route("health_check"));
        then.status(200);
    })
}

/// Answer the query route with a JSON body.
pub fn mock_query(server: &MockServer, body: Value) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path(route("query"));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(body);
    })
}

/// Answer the query route with raw JSON text, keeping exact number formatting.
pub fn mock_query_text<'a>(server: &'a MockServer, body: &str) -> Mock<'a> {
    let body = body.to_string();
    server.mock(move |when, then| {
        when.method(POST).path(route("query"));
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}

/// Open a connection against a mock server that answers its health check.
pub fn connect(server: &MockServer) -> Connection {
    mock_health(server);
    Driver::new()
        .connect(&url_for(server))
        .expect("Failed to connect to mock service")
}
