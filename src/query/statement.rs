//! SQL statement handling and execution.
//!
//! This module provides the `Statement` type for executing SQL text against
//! the query service. Every execution is one blocking round trip.

use crate::error::{ConnectionError, DriverError, QueryError};
use crate::query::results::ResultSet;
use crate::transport::Transport;
use crate::types::TemporalParsing;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// State shared by plain and prepared statements.
#[derive(Clone)]
pub(crate) struct StatementCore {
    transport: Arc<dyn Transport>,
    connection_closed: Arc<AtomicBool>,
    /// Shared with every cursor this statement produced
    closed: Arc<AtomicBool>,
    temporal: TemporalParsing,
}

impl StatementCore {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        connection_closed: Arc<AtomicBool>,
        temporal: TemporalParsing,
    ) -> Self {
        Self {
            transport,
            connection_closed,
            closed: Arc::new(AtomicBool::new(false)),
            temporal,
        }
    }

    pub(crate) fn check_open(&self) -> Result<(), DriverError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(QueryError::StatementClosed.into());
        }
        if self.connection_closed.load(Ordering::Acquire) {
            return Err(ConnectionError::ConnectionClosed.into());
        }
        Ok(())
    }

    pub(crate) fn query(&self, sql: &str, parameters: &[Value]) -> Result<ResultSet, DriverError> {
        self.check_open()?;
        let response = self.transport.query(sql, parameters)?;
        let owners = vec![Arc::clone(&self.closed), Arc::clone(&self.connection_closed)];
        Ok(ResultSet::new(response, owners, self.temporal))
    }

    pub(crate) fn mutate(&self, sql: &str, parameters: &[Value]) -> Result<i64, DriverError> {
        self.check_open()?;
        Ok(self.transport.mutate(sql, parameters)?)
    }

    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.connection_closed.load(Ordering::Acquire)
    }
}

/// SQL statement for query execution.
///
/// Closing a statement also closes every [`ResultSet`] it produced.
pub struct Statement {
    core: StatementCore,
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("closed", &self.is_closed())
            .field("transport", &"<Transport>")
            .finish()
    }
}

impl Statement {
    pub(crate) fn new(core: StatementCore) -> Self {
        Self { core }
    }

    /// Execute a query and return its rows as a cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement or its connection is closed, or the
    /// service request fails.
    pub fn execute_query(&self, sql: &str) -> Result<ResultSet, DriverError> {
        self.core.query(sql, &[])
    }

    /// Execute a data-modifying statement and return the affected-row count.
    pub fn execute_update(&self, sql: &str) -> Result<i64, DriverError> {
        self.core.mutate(sql, &[])
    }

    /// Close the statement. Closing twice is a no-op.
    pub fn close(&self) {
        self.core.close();
    }

    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    pub fn add_batch(&self, _sql: &str) -> Result<(), DriverError> {
        Err(DriverError::not_supported("Statement::add_batch"))
    }

    pub fn execute_batch(&self) -> Result<Vec<i64>, DriverError> {
        Err(DriverError::not_supported("Statement::execute_batch"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::messages::{ColumnDescriptor, QueryResponse};
    use crate::types::LogicalType;
    use mockall::mock;
    use mockall::predicate::*;

    // Mock transport for testing
    mock! {
        pub Transport {}

        impl crate::transport::Transport for Transport {
            fn health_check(&self) -> bool;
            fn query(&self, sql: &str, parameters: &[Value]) -> Result<QueryResponse, TransportError>;
            fn mutate(&self, sql: &str, parameters: &[Value]) -> Result<i64, TransportError>;
        }
    }

    pub(crate) fn customers_response() -> QueryResponse {
        QueryResponse {
            schema: vec![ColumnDescriptor::new("LastName", LogicalType::String)],
            results: (0..3)
                .map(|i| {
                    let mut row = serde_json::Map::new();
                    row.insert("LastName".to_string(), Value::from(format!("LName{}", i)));
                    row
                })
                .collect(),
        }
    }

    fn statement(transport: MockTransport) -> (Statement, Arc<AtomicBool>) {
        let connection_closed = Arc::new(AtomicBool::new(false));
        let core = StatementCore::new(
            Arc::new(transport),
            Arc::clone(&connection_closed),
            TemporalParsing::Lenient,
        );
        (Statement::new(core), connection_closed)
    }

    #[test]
    fn test_execute_query() {
        let mut transport = MockTransport::new();
        transport
            .expect_query()
            .with(eq("SELECT * FROM Customers"), always())
            .times(1)
            .returning(|_, params| {
                assert!(params.is_empty());
                Ok(customers_response())
            });

        let (stmt, _) = statement(transport);
        let mut rs = stmt.execute_query("SELECT * FROM Customers").unwrap();

        assert_eq!(rs.row_count(), 3);
        assert!(rs.next().unwrap());
        assert_eq!(rs.get_string("LastName").unwrap().as_deref(), Some("LName0"));
    }

    #[test]
    fn test_execute_update() {
        let mut transport = MockTransport::new();
        transport
            .expect_mutate()
            .with(eq("UPDATE Customers SET LastName='x'"), always())
            .returning(|_, _| Ok(5));

        let (stmt, _) = statement(transport);
        assert_eq!(stmt.execute_update("UPDATE Customers SET LastName='x'").unwrap(), 5);
    }

    #[test]
    fn test_transport_error_propagates() {
        let mut transport = MockTransport::new();
        transport.expect_query().returning(|_, _| {
            Err(TransportError::HttpStatus {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        });

        let (stmt, _) = statement(transport);
        let err = stmt.execute_query("SELECT 1").unwrap_err();
        assert!(matches!(
            err,
            DriverError::Transport(TransportError::HttpStatus { status: 500, .. })
        ));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_closed_statement_rejects_execution() {
        let mut transport = MockTransport::new();
        transport.expect_query().never();

        let (stmt, _) = statement(transport);
        stmt.close();
        stmt.close();

        assert!(stmt.is_closed());
        assert!(matches!(
            stmt.execute_query("SELECT 1"),
            Err(DriverError::Query(QueryError::StatementClosed))
        ));
    }

    #[test]
    fn test_closed_connection_rejects_execution() {
        let mut transport = MockTransport::new();
        transport.expect_mutate().never();

        let (stmt, connection_closed) = statement(transport);
        connection_closed.store(true, Ordering::Release);

        assert!(stmt.is_closed());
        assert!(matches!(
            stmt.execute_update("DELETE FROM t"),
            Err(DriverError::Connection(ConnectionError::ConnectionClosed))
        ));
    }

    #[test]
    fn test_close_statement_closes_cursor() {
        let mut transport = MockTransport::new();
        transport.expect_query().returning(|_, _| Ok(customers_response()));

        let (stmt, _) = statement(transport);
        let mut rs = stmt.execute_query("SELECT * FROM Customers").unwrap();
        assert!(rs.next().unwrap());

        stmt.close();
        assert!(rs.is_closed());
        assert!(matches!(rs.next(), Err(QueryError::CursorClosed)));
    }

    #[test]
    fn test_batch_not_supported() {
        let (stmt, _) = statement(MockTransport::new());
        assert!(matches!(
            stmt.add_batch("INSERT INTO t VALUES (1)"),
            Err(DriverError::NotSupported { .. })
        ));
        assert!(matches!(
            stmt.execute_batch(),
            Err(DriverError::NotSupported { .. })
        ));
    }
}
