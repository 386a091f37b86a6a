//! Connection string handling.
//!
//! This module parses driver URLs into an immutable [`ConnectionDescriptor`]
//! and resolves the service routes a connection talks to.
//!
//! # Example
//!
//! ```
//! # use odbcbridge_rs::connection::{ConnectionBuilder, ConnectionDescriptor, Route};
//! // Parse from a connection string
//! let descriptor = ConnectionDescriptor::parse(
//!     "jdbc:odbcbridge://localhost:5000;databaseName=sales;user=sys;password=pw;useSsl=false;",
//! );
//! assert_eq!(
//!     descriptor.endpoint_url(Route::Query).unwrap().as_str(),
//!     "http://localhost:5000/v1/sales/query"
//! );
//!
//! // Or build programmatically
//! let descriptor = ConnectionBuilder::new()
//!     .host("localhost")
//!     .port(5000)
//!     .database("sales")
//!     .build()
//!     .unwrap();
//! assert!(descriptor.use_ssl);
//! ```

pub mod params;

pub use params::{ConnectionBuilder, ConnectionDescriptor, Endpoint, Route, Scheme};
