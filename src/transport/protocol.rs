//! Transport protocol abstraction trait.
//!
//! This module defines the `Transport` trait that connections and statements
//! talk to. The HTTP implementation lives in [`super::http`]; tests substitute
//! a mock.

use crate::error::TransportError;
use serde_json::Value;

use super::messages::QueryResponse;

/// One request/response round trip against the query service.
///
/// Every call blocks the calling thread until the response is read.
pub trait Transport: Send + Sync {
    /// Check that the service answers for the configured database.
    ///
    /// # Returns
    ///
    /// `true` iff the health-check route answered with a 2xx status. Network
    /// failures report `false` rather than an error.
    fn health_check(&self) -> bool;

    /// Execute a statement that produces rows.
    ///
    /// # Arguments
    ///
    /// * `sql` - SQL statement to execute
    /// * `parameters` - Encoded positional parameters
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on a non-2xx status, an I/O failure, or a body
    /// that is not a query response.
    fn query(&self, sql: &str, parameters: &[Value]) -> Result<QueryResponse, TransportError>;

    /// Execute a statement that modifies data.
    ///
    /// # Returns
    ///
    /// The number of affected rows reported by the service.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on a non-2xx status, an I/O failure, or a body
    /// without an integer `rowsAffected`.
    fn mutate(&self, sql: &str, parameters: &[Value]) -> Result<i64, TransportError>;
}
