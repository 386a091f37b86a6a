//! Error types for odbcbridge-rs.
//!
//! This module defines domain-specific error types organized by functional area.

use std::fmt;
use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Connection-related errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Statement and cursor errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Data conversion errors
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// HTTP protocol errors
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Capability the bridge does not implement
    #[error("Operation not supported: {operation}")]
    NotSupported { operation: String },
}

/// Errors related to establishing or using a connection.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The remote service did not answer the health check
    #[error("Can't connect to remote server at {host}:{port}: {message}")]
    ConnectionFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// Invalid connection parameters
    #[error("Invalid connection parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// The URL is not one this driver handles
    #[error("URL not accepted by this driver: {0}")]
    UrlNotAccepted(String),

    /// The URL parsed but carries no usable endpoint
    #[error("Connection string has no endpoint: {0}")]
    NotConnectable(String),

    /// Connection is closed
    #[error("Connection is closed")]
    ConnectionClosed,
}

/// Errors raised by statements and result cursors.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Invalid statement or cursor state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Parameter binding error
    #[error("Parameter binding error for parameter {index}: {message}")]
    ParameterBindingError { index: usize, message: String },

    /// Statement has been closed
    #[error("Statement is closed")]
    StatementClosed,

    /// Result set has been closed
    #[error("ResultSet is closed")]
    CursorClosed,

    /// Column name or position not present in the current row
    #[error("{0} is not a valid column in the ResultSet")]
    NoSuchColumn(String),

    /// Metadata column index outside `[1, column_count]`
    #[error("Column index {index} out of bounds (result has {count} columns)")]
    ColumnIndexOutOfBounds { index: usize, count: usize },
}

/// Errors related to value coercion.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Malformed temporal literal under strict parsing
    #[error("Invalid {kind} literal: '{value}'")]
    InvalidTemporal { kind: &'static str, value: String },

    /// Invalid numeric text
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Value does not fit the target type
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),
}

/// Errors raised by the HTTP transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Server answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Network I/O error (refused, timeout, TLS)
    #[error("Network I/O error: {0}")]
    IoError(String),

    /// Response body was not the expected JSON shape
    #[error("Malformed server response: {0}")]
    MalformedResponse(String),

    /// Endpoint URL could not be built
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Driver error codes.
///
/// Codes classify every error into the categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unknown error
    Unknown = 0,
    /// Connection error
    Connection = 1,
    /// Query error
    Query = 2,
    /// Invalid argument
    InvalidArgument = 3,
    /// Invalid state
    InvalidState = 4,
    /// Not implemented
    NotImplemented = 5,
    /// Client/server protocol mismatch
    Internal = 6,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Unknown => write!(f, "UNKNOWN"),
            ErrorCode::Connection => write!(f, "CONNECTION"),
            ErrorCode::Query => write!(f, "QUERY"),
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::InvalidState => write!(f, "INVALID_STATE"),
            ErrorCode::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
            ErrorCode::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl DriverError {
    /// Shorthand for an unsupported capability.
    pub fn not_supported(operation: impl Into<String>) -> Self {
        DriverError::NotSupported {
            operation: operation.into(),
        }
    }

    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            DriverError::Connection(e) => e.code(),
            DriverError::Query(e) => e.code(),
            DriverError::Conversion(_) => ErrorCode::Query,
            DriverError::Transport(e) => e.code(),
            DriverError::NotSupported { .. } => ErrorCode::NotImplemented,
        }
    }

    /// Whether the error signals a protocol mismatch that must not be retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DriverError::Transport(TransportError::MalformedResponse(_))
        )
    }
}

impl ConnectionError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConnectionError::InvalidParameter { .. } | ConnectionError::UrlNotAccepted(_) => {
                ErrorCode::InvalidArgument
            }
            ConnectionError::ConnectionClosed => ErrorCode::InvalidState,
            _ => ErrorCode::Connection,
        }
    }
}

impl QueryError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            QueryError::InvalidState(_)
            | QueryError::StatementClosed
            | QueryError::CursorClosed => ErrorCode::InvalidState,
            QueryError::ParameterBindingError { .. }
            | QueryError::NoSuchColumn(_)
            | QueryError::ColumnIndexOutOfBounds { .. } => ErrorCode::InvalidArgument,
        }
    }
}

impl TransportError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TransportError::MalformedResponse(_) => ErrorCode::Internal,
            TransportError::InvalidEndpoint(_) => ErrorCode::InvalidArgument,
            _ => ErrorCode::Connection,
        }
    }
}

// Conversions from external error types
impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::MalformedResponse(err.to_string())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => TransportError::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => TransportError::IoError(err.to_string()),
        }
    }
}
