//! # odbcbridge-rs
//!
//! SQL client driver for an HTTP/JSON query bridge.
//!
//! Statements are sent as JSON envelopes to a remote service that runs them
//! against its database and answers with a column schema plus row objects.
//! The driver turns those answers into a scrollable [`ResultSet`] with typed
//! getters. Every call is a single blocking round trip.
//!
//! ## Example
//!
//! ```no_run
//! # use odbcbridge_rs::*;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = Driver::new();
//! let connection = driver.connect(
//!     "jdbc:odbcbridge://localhost:5000;databaseName=sales;user=sys;password=pw;useSsl=false;",
//! )?;
//!
//! let statement = connection.create_statement()?;
//! let mut results = statement.execute_query("SELECT * FROM Customers")?;
//! while results.next()? {
//!     println!("{:?}", results.get_string("LastName")?);
//! }
//!
//! connection.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod connection;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

// Re-export public API
pub use client::{Connection, Driver};
pub use connection::{ConnectionBuilder, ConnectionDescriptor};
pub use error::{
    ConnectionError, ConversionError, DriverError, ErrorCode, QueryError, TransportError,
};
pub use query::{Column, PreparedStatement, ResultSet, ResultSetMetadata, Statement};
pub use types::{Decimal, LogicalType, Parameter, SqlType, SqlValue, TargetKind, TypeMapper};
