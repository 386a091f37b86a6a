//! Transport layer for the query service.
//!
//! # Architecture
//!
//! The transport layer is organized into:
//! - `protocol` - Transport trait definition
//! - `messages` - Request and response envelopes
//! - `http` - Blocking HTTP implementation
//!
//! # Example
//!
//! ```no_run
//! use odbcbridge_rs::connection::ConnectionDescriptor;
//! use odbcbridge_rs::transport::{HttpTransport, Transport};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let descriptor = ConnectionDescriptor::parse(
//!     "jdbc:odbcbridge://localhost:5000;databaseName=sales;useSsl=false;",
//! );
//! let transport = HttpTransport::new(descriptor)?;
//!
//! if transport.health_check() {
//!     let response = transport.query("SELECT * FROM Customers", &[])?;
//!     println!("{} rows", response.results.len());
//!
//!     let changed = transport.mutate("DELETE FROM Customers", &[])?;
//!     println!("{} rows deleted", changed);
//! }
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod messages;
pub mod protocol;

pub use http::HttpTransport;
pub use messages::{ColumnDescriptor, MutateResponse, QueryResponse, RequestEnvelope, Row};
pub use protocol::Transport;
