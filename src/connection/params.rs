//! Connection string parsing.
//!
//! A connection string has the shape
//! `scheme://host:port;key1=value1;key2=value2;...`. Only the part after `//` in
//! the first segment is used as the endpoint authority; the transport scheme is
//! chosen by the `useSsl` property.

use crate::client::Connection;
use crate::error::{ConnectionError, DriverError};
use reqwest::Url;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Transport scheme used to reach the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    fn from_ssl(use_ssl: bool) -> Self {
        if use_ssl {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }

    /// Scheme name as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service route relative to `/v1/{database}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    HealthCheck,
    Query,
    Mutate,
}

impl Route {
    fn segment(&self) -> &'static str {
        match self {
            Route::HealthCheck => "health_check",
            Route::Query => "query",
            Route::Mutate => "mutate",
        }
    }
}

/// Resolved base address of the query service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    base: Url,
}

impl Endpoint {
    fn parse(scheme: Scheme, authority: &str) -> Option<Self> {
        let base = Url::parse(&format!("{}://{}", scheme, authority)).ok()?;
        base.host_str()?;
        Some(Self { scheme, base })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        self.base.host_str().unwrap_or_default()
    }

    /// Explicit port, or the scheme's default.
    pub fn port(&self) -> u16 {
        self.base.port_or_known_default().unwrap_or(0)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host(), self.port())
    }
}

/// Parsed connection string.
///
/// Descriptors are immutable: parsing a different URL yields a new descriptor,
/// so nothing from an earlier URL carries over.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    url: String,
    endpoint: Option<Endpoint>,
    /// Database name (`databaseName`)
    pub database: Option<String>,
    /// Username (`user`)
    pub username: Option<String>,
    password: Option<String>,
    /// `useSsl`; true unless set to anything other than `"true"`
    pub use_ssl: bool,
    /// Fail on malformed temporal literals instead of substituting epoch zero
    pub strict_temporal: bool,
}

impl ConnectionDescriptor {
    /// Parse a connection string.
    ///
    /// Never fails: a string without `//` or with an unusable authority produces
    /// a descriptor without an endpoint, which [`connectable`](Self::connectable)
    /// rejects.
    ///
    /// ```
    /// # use odbcbridge_rs::connection::{ConnectionDescriptor, Scheme};
    /// let descriptor = ConnectionDescriptor::parse(
    ///     "jdbc:odbcbridge://localhost:5000;databaseName=sales;user=bob;useSsl=false;",
    /// );
    /// let endpoint = descriptor.endpoint().unwrap();
    /// assert_eq!(endpoint.scheme(), Scheme::Http);
    /// assert_eq!(endpoint.port(), 5000);
    /// assert_eq!(descriptor.database.as_deref(), Some("sales"));
    /// ```
    pub fn parse(url: &str) -> Self {
        let mut descriptor = Self::empty(url);
        let mut segments = url.split(';');
        let base = segments.next().unwrap_or_default();

        for fragment in segments {
            if let Some((key, value)) = fragment.split_once('=') {
                descriptor.apply_property(key, value);
            }
        }

        descriptor.endpoint = base
            .split("//")
            .nth(1)
            .and_then(|authority| Endpoint::parse(Scheme::from_ssl(descriptor.use_ssl), authority));

        descriptor
    }

    fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            endpoint: None,
            database: None,
            username: None,
            password: None,
            use_ssl: true,
            strict_temporal: false,
        }
    }

    fn apply_property(&mut self, key: &str, value: &str) {
        match key {
            "databaseName" => self.database = Some(value.to_string()),
            "user" => self.username = Some(value.to_string()),
            "password" => self.password = Some(value.to_string()),
            "useSsl" => self.use_ssl = value == "true",
            "strictTemporal" => self.strict_temporal = value == "true",
            _ => {}
        }
    }

    /// Create a new ConnectionBuilder.
    pub fn builder() -> ConnectionBuilder {
        ConnectionBuilder::new()
    }

    /// The connection string this descriptor was parsed from, with the
    /// password redacted.
    pub fn url(&self) -> String {
        redact(&self.url)
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Get the password (for internal use only, never logged).
    pub(crate) fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Return the endpoint, or an error if the descriptor cannot be connected.
    pub fn connectable(&self) -> Result<&Endpoint, ConnectionError> {
        self.endpoint
            .as_ref()
            .ok_or_else(|| ConnectionError::NotConnectable(redact(&self.url)))
    }

    /// Build the absolute URL of a service route: `/v1/{database}/{route}`.
    ///
    /// # Errors
    ///
    /// Fails when there is no endpoint or the database name is unset or empty.
    pub fn endpoint_url(&self, route: Route) -> Result<Url, ConnectionError> {
        let endpoint = self.connectable()?;
        let database = self
            .database
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ConnectionError::InvalidParameter {
                parameter: "databaseName".to_string(),
                message: "Database name is required".to_string(),
            })?;

        let mut url = endpoint.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ConnectionError::NotConnectable(endpoint.to_string()))?
            .clear()
            .extend(["v1", database, route.segment()]);

        Ok(url)
    }
}

impl FromStr for ConnectionDescriptor {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

// Prevent password from being displayed in debug or display output
impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("endpoint", &self.endpoint)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("use_ssl", &self.use_ssl)
            .field("strict_temporal", &self.strict_temporal)
            .finish()
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let endpoint = self
            .endpoint
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        write!(
            f,
            "ConnectionDescriptor {{ endpoint: {}, database: {:?}, username: {:?}, use_ssl: {} }}",
            endpoint, self.database, self.username, self.use_ssl
        )
    }
}

/// Strip the password property from a connection string for error messages.
pub(crate) fn redact(url: &str) -> String {
    url.split(';')
        .map(|fragment| match fragment.split_once('=') {
            Some(("password", _)) => "password=<redacted>",
            _ => fragment,
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Builder for constructing a ConnectionDescriptor without a connection string.
#[derive(Debug, Clone, Default)]
pub struct ConnectionBuilder {
    host: Option<String>,
    port: Option<u16>,
    use_ssl: Option<bool>,
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
    strict_temporal: bool,
}

impl ConnectionBuilder {
    /// Create a new ConnectionBuilder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service host.
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    /// Set the service port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enable or disable TLS (default: enabled).
    pub fn use_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = Some(use_ssl);
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: &str) -> Self {
        self.database = Some(database.to_string());
        self
    }

    /// Set the username.
    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Reject malformed temporal literals instead of substituting epoch zero.
    pub fn strict_temporal(mut self, strict: bool) -> Self {
        self.strict_temporal = strict;
        self
    }

    /// Build the descriptor with validation.
    pub fn build(self) -> Result<ConnectionDescriptor, ConnectionError> {
        let host = self
            .host
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConnectionError::InvalidParameter {
                parameter: "host".to_string(),
                message: "Host is required".to_string(),
            })?;

        if self.port == Some(0) {
            return Err(ConnectionError::InvalidParameter {
                parameter: "port".to_string(),
                message: "Port must be greater than 0".to_string(),
            });
        }

        let use_ssl = self.use_ssl.unwrap_or(true);
        let authority = match self.port {
            Some(port) => format!("{}:{}", host, port),
            None => host.clone(),
        };

        let endpoint = Endpoint::parse(Scheme::from_ssl(use_ssl), &authority).ok_or_else(|| {
            ConnectionError::InvalidParameter {
                parameter: "host".to_string(),
                message: format!("Invalid host: {}", host),
            }
        })?;

        let mut url = format!("odbcbridge://{};useSsl={};", authority, use_ssl);
        if let Some(database) = &self.database {
            url.push_str(&format!("databaseName={};", database));
        }
        if let Some(username) = &self.username {
            url.push_str(&format!("user={};", username));
        }

        Ok(ConnectionDescriptor {
            url,
            endpoint: Some(endpoint),
            database: self.database,
            username: self.username,
            password: self.password,
            use_ssl,
            strict_temporal: self.strict_temporal,
        })
    }

    /// Build the descriptor and open a connection.
    ///
    /// # Errors
    ///
    /// Returns `DriverError` if validation fails or the service is unreachable.
    pub fn connect(self) -> Result<Connection, DriverError> {
        Connection::from_descriptor(self.build()?)
    }
}
