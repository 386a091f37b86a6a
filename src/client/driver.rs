//! Driver entry point.
//!
//! This module provides the `Driver` type which carries metadata about the
//! bridge driver and opens connections from driver URLs.

use crate::client::Connection;
use crate::connection::params::redact;
use crate::connection::ConnectionDescriptor;
use crate::error::{ConnectionError, DriverError};

/// Marker every accepted driver URL contains.
const URL_MARKER: &str = "odbcbridge://";

/// SQL client driver for the HTTP/JSON query bridge.
///
/// The `Driver` decides which URLs it handles and opens a [`Connection`]
/// after checking that the remote service answers.
///
/// # Example
///
/// ```
/// use odbcbridge_rs::Driver;
///
/// let driver = Driver::new();
/// println!("Driver: {} v{}", driver.name(), driver.version());
/// assert!(driver.accepts_url("jdbc:odbcbridge://localhost:5000;databaseName=sales;"));
/// ```
#[derive(Debug, Clone)]
pub struct Driver {
    name: String,
    version: String,
}

impl Driver {
    /// Create a new Driver instance.
    ///
    /// # Example
    ///
    /// ```
    /// use odbcbridge_rs::Driver;
    ///
    /// let driver = Driver::new();
    /// assert_eq!(driver.name(), "odbcbridge-rs");
    /// ```
    pub fn new() -> Self {
        Self {
            name: "odbcbridge-rs".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get the driver name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the driver version.
    ///
    /// # Returns
    ///
    /// The version string from the Cargo.toml.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn major_version(&self) -> u32 {
        self.version_part(0)
    }

    pub fn minor_version(&self) -> u32 {
        self.version_part(1)
    }

    fn version_part(&self, position: usize) -> u32 {
        self.version
            .split('.')
            .nth(position)
            .and_then(|part| part.parse().ok())
            .unwrap_or(0)
    }

    /// The bridge does not pass a conformance suite.
    pub fn is_compliant(&self) -> bool {
        false
    }

    /// Check whether this driver handles a URL.
    ///
    /// # Example
    ///
    /// ```
    /// use odbcbridge_rs::Driver;
    ///
    /// let driver = Driver::new();
    /// assert!(driver.accepts_url("jdbc:odbcbridge://host:1;"));
    /// assert!(!driver.accepts_url("jdbc:postgresql://host:5432/db"));
    /// ```
    pub fn accepts_url(&self, url: &str) -> bool {
        url.contains(URL_MARKER)
    }

    /// Open a connection.
    ///
    /// The URL is parsed into a [`ConnectionDescriptor`] and the service's
    /// health route is probed once before the connection is handed out.
    ///
    /// # Arguments
    ///
    /// * `url` - Driver URL in the format:
    ///   `jdbc:odbcbridge://host:port;databaseName=db;user=u;password=p;useSsl=false;`
    ///
    /// # Errors
    ///
    /// - `ConnectionError::UrlNotAccepted` if the URL lacks the driver marker
    /// - `ConnectionError::NotConnectable` if no endpoint could be parsed
    /// - `ConnectionError::ConnectionFailed` if the health check fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// use odbcbridge_rs::Driver;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let connection = Driver::new()
    ///     .connect("jdbc:odbcbridge://localhost:5000;databaseName=sales;useSsl=false;")?;
    /// assert!(!connection.is_closed());
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(&self, url: &str) -> Result<Connection, DriverError> {
        if !self.accepts_url(url) {
            return Err(ConnectionError::UrlNotAccepted(redact(url)).into());
        }

        self.connect_with(ConnectionDescriptor::parse(url))
    }

    /// Open a connection from an already built descriptor.
    pub fn connect_with(&self, descriptor: ConnectionDescriptor) -> Result<Connection, DriverError> {
        Connection::from_descriptor(descriptor)
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}
