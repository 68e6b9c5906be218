//! Error types for the Livestatus client
//!
//! This module defines all error types that can occur while querying a
//! Livestatus endpoint, from caller mistakes in the composite query to
//! transport faults and typed value coercion failures.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Stage of an `execute` call an I/O error happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Opening the TCP connection
    Connect,
    /// Exchanging the `GET columns` request
    Metadata,
    /// Exchanging the caller's query
    Data,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Connect => write!(f, "connect"),
            Phase::Metadata => write!(f, "metadata"),
            Phase::Data => write!(f, "data"),
        }
    }
}

/// Main error type for the Livestatus client
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    // =========================================================================
    // Query Errors
    // =========================================================================
    /// The composite query could not be turned into a request
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    /// Another `execute` is already running on this client
    #[error("a query is already in progress on this client")]
    QueryInProgress,

    // =========================================================================
    // Connection Errors
    // =========================================================================
    /// DNS failure or refused connection
    #[error("failed to connect to {host}:{port}: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connect did not complete within the configured bound
    #[error("connection to {host}:{port} timed out after {timeout:?}")]
    ConnectionTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    /// Socket fault after the connection was established
    #[error("I/O error during {phase} phase with {host}:{port}: {source}")]
    Io {
        phase: Phase,
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// The query was aborted through [`Client::cancel`](crate::Client::cancel)
    #[error("query cancelled")]
    Cancelled,

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// Non-200 status from the monitoring core
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Declared payload exceeds the configured cap
    #[error("response of {declared} bytes exceeds the limit of {limit} bytes")]
    ResponseTooLarge { declared: usize, limit: usize },

    /// Response header line could not be parsed
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    // =========================================================================
    // Cursor Errors
    // =========================================================================
    /// Column name not present in the result header
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Cell text does not parse as the column's declared type
    #[error("cannot convert {value:?} in column {column} to {target}")]
    Conversion {
        column: String,
        value: String,
        target: &'static str,
    },

    /// Value access while the cursor is not on a data row
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
}

/// Where an I/O error happened, for wrapping into [`Error::Io`]
#[derive(Debug, Clone, Copy)]
pub(crate) struct IoContext<'a> {
    pub phase: Phase,
    pub host: &'a str,
    pub port: u16,
}

impl IoContext<'_> {
    pub fn wrap(&self, source: io::Error) -> Error {
        Error::Io {
            phase: self.phase,
            host: self.host.to_string(),
            port: self.port,
            source,
        }
    }
}

impl Error {
    /// Create a new server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Error::Server {
            status,
            message: message.into(),
        }
    }

    /// Check if the connection could not be established.
    ///
    /// Faults on an open socket are [`Error::Io`] and are not included.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection { .. } | Error::ConnectionTimeout { .. })
    }

    /// Check if this error is recoverable (the caller may resubmit)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. } | Error::ConnectionTimeout { .. } | Error::QueryInProgress
        )
    }

    /// Check if this error came from [`Client::cancel`](crate::Client::cancel)
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Check if the server rejected the query's table
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Error::Server { status: 404, .. })
    }

    /// Check if a proxying core could not reach its backend site
    pub fn is_bad_gateway(&self) -> bool {
        matches!(self, Error::Server { status: 502, .. })
    }
}
