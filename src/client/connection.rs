//! Connection implementation.
//!
//! A `Connection` owns one transport for its whole life and hands it to every
//! statement it creates. Closing the connection closes those statements and
//! their cursors.

use crate::connection::ConnectionDescriptor;
use crate::error::{ConnectionError, DriverError};
use crate::query::statement::StatementCore;
use crate::query::{PreparedStatement, Statement};
use crate::transport::{HttpTransport, Transport};
use crate::types::TemporalParsing;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// An open connection to the query service.
///
/// # Example
///
/// ```no_run
/// use odbcbridge_rs::Driver;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let connection = Driver::new()
///     .connect("jdbc:odbcbridge://localhost:5000;databaseName=sales;useSsl=false;")?;
///
/// let statement = connection.create_statement()?;
/// let updated = statement.execute_update("UPDATE Customers SET LastName = 'x'")?;
/// println!("{} rows updated", updated);
///
/// connection.close();
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    descriptor: ConnectionDescriptor,
    transport: Arc<dyn Transport>,
    /// Shared with every statement created from this connection
    closed: Arc<AtomicBool>,
}

impl Connection {
    /// Open a connection over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::NotConnectable` if the descriptor has no
    /// endpoint and `ConnectionError::ConnectionFailed` if the service does
    /// not answer its health check.
    pub fn from_descriptor(descriptor: ConnectionDescriptor) -> Result<Self, DriverError> {
        descriptor.connectable()?;
        let transport = HttpTransport::new(descriptor.clone())?;
        Self::with_transport(descriptor, Arc::new(transport))
    }

    /// Open a connection over any [`Transport`].
    ///
    /// The transport's health check must pass before the connection is
    /// returned.
    pub fn with_transport(
        descriptor: ConnectionDescriptor,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, DriverError> {
        let endpoint = descriptor.connectable()?;

        if !transport.health_check() {
            return Err(ConnectionError::ConnectionFailed {
                host: endpoint.host().to_string(),
                port: endpoint.port(),
                message: "health check failed".to_string(),
            }
            .into());
        }

        info!(
            endpoint = %endpoint,
            database = descriptor.database.as_deref().unwrap_or_default(),
            "Connected"
        );

        Ok(Self {
            descriptor,
            transport,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get the connection descriptor.
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    fn statement_core(&self) -> Result<StatementCore, DriverError> {
        if self.is_closed() {
            return Err(ConnectionError::ConnectionClosed.into());
        }

        Ok(StatementCore::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.closed),
            TemporalParsing::from_strict(self.descriptor.strict_temporal),
        ))
    }

    /// Create a statement for executing SQL text.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::ConnectionClosed` if the connection is closed.
    pub fn create_statement(&self) -> Result<Statement, DriverError> {
        Ok(Statement::new(self.statement_core()?))
    }

    /// Create a prepared statement with positional `?` parameters.
    ///
    /// The SQL text is sent as-is on every execution; nothing is prepared
    /// on the service side.
    pub fn prepare_statement(&self, sql: impl Into<String>) -> Result<PreparedStatement, DriverError> {
        Ok(PreparedStatement::new(self.statement_core()?, sql))
    }

    pub fn prepare_call(&self, _sql: &str) -> Result<(), DriverError> {
        Err(DriverError::not_supported("Connection::prepare_call"))
    }

    /// Check whether the connection is open and the service still answers.
    pub fn is_valid(&self) -> bool {
        !self.is_closed() && self.transport.health_check()
    }

    /// Every statement commits on its own.
    pub fn auto_commit(&self) -> bool {
        true
    }

    pub fn commit(&self) -> Result<(), DriverError> {
        Err(DriverError::not_supported("Connection::commit"))
    }

    pub fn rollback(&self) -> Result<(), DriverError> {
        Err(DriverError::not_supported("Connection::rollback"))
    }

    pub fn set_savepoint(&self, _name: &str) -> Result<(), DriverError> {
        Err(DriverError::not_supported("Connection::set_savepoint"))
    }

    /// Database the connection targets.
    pub fn catalog(&self) -> Option<&str> {
        self.descriptor.database.as_deref()
    }

    pub fn is_read_only(&self) -> bool {
        false
    }

    /// Close the connection. Closing twice is a no-op.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("Connection closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("descriptor", &self.descriptor)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::query::statement::tests::{customers_response, MockTransport};
    use mockall::predicate::*;

    const URL: &str = "jdbc:odbcbridge://db.example.com:5000;databaseName=sales;useSsl=false;";

    fn healthy() -> MockTransport {
        let mut transport = MockTransport::new();
        transport.expect_health_check().returning(|| true);
        transport
    }

    #[test]
    fn test_with_transport_checks_health() {
        let mut transport = MockTransport::new();
        transport.expect_health_check().times(1).returning(|| false);

        let err = Connection::with_transport(ConnectionDescriptor::parse(URL), Arc::new(transport))
            .unwrap_err();
        match err {
            DriverError::Connection(ConnectionError::ConnectionFailed { host, port, message }) => {
                assert_eq!(host, "db.example.com");
                assert_eq!(port, 5000);
                assert_eq!(message, "health check failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_with_transport_requires_endpoint() {
        let mut transport = MockTransport::new();
        transport.expect_health_check().never();

        let err = Connection::with_transport(
            ConnectionDescriptor::parse("no endpoint here"),
            Arc::new(transport),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DriverError::Connection(ConnectionError::NotConnectable(_))
        ));
    }

    #[test]
    fn test_statement_round_trip() {
        let mut transport = healthy();
        transport
            .expect_query()
            .with(eq("SELECT * FROM Customers"), always())
            .returning(|_, _| Ok(customers_response()));

        let connection =
            Connection::with_transport(ConnectionDescriptor::parse(URL), Arc::new(transport)).unwrap();
        let statement = connection.create_statement().unwrap();
        let mut rs = statement.execute_query("SELECT * FROM Customers").unwrap();

        assert!(rs.last().unwrap());
        assert_eq!(rs.get_row().unwrap(), 3);
        assert_eq!(connection.catalog(), Some("sales"));
    }

    #[test]
    fn test_close_propagates_to_statements() {
        let mut transport = healthy();
        transport.expect_query().returning(|_, _| Ok(customers_response()));
        transport.expect_mutate().never();

        let connection =
            Connection::with_transport(ConnectionDescriptor::parse(URL), Arc::new(transport)).unwrap();
        let statement = connection.create_statement().unwrap();
        let prepared = connection.prepare_statement("DELETE FROM t").unwrap();
        let mut rs = statement.execute_query("SELECT 1").unwrap();

        connection.close();
        connection.close();

        assert!(connection.is_closed());
        assert!(!connection.is_valid());
        assert!(statement.is_closed());
        assert!(prepared.is_closed());
        assert!(matches!(
            prepared.execute_update(),
            Err(DriverError::Connection(ConnectionError::ConnectionClosed))
        ));
        assert!(matches!(rs.next(), Err(QueryError::CursorClosed)));
        assert!(matches!(
            connection.create_statement(),
            Err(DriverError::Connection(ConnectionError::ConnectionClosed))
        ));
    }

    #[test]
    fn test_strict_temporal_reaches_cursor() {
        let mut transport = healthy();
        transport.expect_query().returning(|_, _| {
            Ok(serde_json::from_str(
                r#"{"schema":[{"columnName":"Born","dataType":"date"}],"results":[{"Born":"not-a-date"}]}"#,
            )
            .unwrap())
        });

        let connection = Connection::with_transport(
            ConnectionDescriptor::parse(
                "odbcbridge://h:1;databaseName=db;useSsl=false;strictTemporal=true;",
            ),
            Arc::new(transport),
        )
        .unwrap();
        let mut rs = connection.create_statement().unwrap().execute_query("SELECT Born").unwrap();
        assert!(rs.next().unwrap());
        assert!(matches!(rs.get_date("Born"), Err(DriverError::Conversion(_))));
    }

    #[test]
    fn test_unsupported_operations() {
        let connection =
            Connection::with_transport(ConnectionDescriptor::parse(URL), Arc::new(healthy())).unwrap();

        assert!(connection.auto_commit());
        assert!(!connection.is_read_only());
        for result in [
            connection.commit(),
            connection.rollback(),
            connection.set_savepoint("sp1"),
            connection.prepare_call("{call proc()}"),
        ] {
            assert!(matches!(result, Err(DriverError::NotSupported { .. })));
        }
    }
}
