//! Client configuration
//!
//! The connection target is part of every composite query, so `Config` only
//! carries the knobs that stay the same across queries.

use std::time::Duration;

use crate::constants::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_RESPONSE_SIZE};
use crate::query::lqencode;

/// Client configuration.
///
/// # Examples
///
/// ```rust
/// use livestatus_rs::Config;
/// use std::time::Duration;
///
/// let config = Config::new()
///     .connect_timeout(Duration::from_secs(5))
///     .auth_user("nagiosadmin")
///     .limit(500);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Bound on DNS resolution plus TCP connect
    pub connect_timeout: Duration,
    /// Largest declared payload accepted from the server
    pub max_response_size: usize,
    /// Contact sent as `AuthUser:` on every request
    pub auth_user: Option<String>,
    /// Row limit appended to the data request
    pub limit: Option<usize>,
    /// Extra header lines appended to every request
    pub headers: Vec<String>,
}

impl Config {
    /// Create a configuration with the protocol defaults
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            auth_user: None,
            limit: None,
            headers: Vec::new(),
        }
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the payload cap
    pub fn max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = bytes;
        self
    }

    /// Run queries on behalf of a contact
    pub fn auth_user(mut self, user: impl Into<String>) -> Self {
        self.auth_user = Some(user.into());
        self
    }

    /// Limit the number of data rows
    pub fn limit(mut self, rows: usize) -> Self {
        self.limit = Some(rows);
        self
    }

    /// Append a raw header line such as `Localtime: 1700000000`.
    ///
    /// Newlines are stripped so the line cannot end the request early.
    pub fn header(mut self, line: impl AsRef<str>) -> Self {
        let line = lqencode(line.as_ref());
        if !line.trim().is_empty() {
            self.headers.push(line);
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.max_response_size, 10 * 1024 * 1024);
        assert!(config.auth_user.is_none());
        assert!(config.limit.is_none());
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_extra_headers() {
        let config = Config::new()
            .header("Localtime: 1700000000")
            .header("WaitTimeout: 5\n\nGET hosts")
            .header("  ");
        assert_eq!(
            config.headers,
            vec!["Localtime: 1700000000".to_string(), "WaitTimeout: 5GET hosts".to_string()]
        );
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .connect_timeout(Duration::from_millis(250))
            .max_response_size(1024)
            .auth_user("omdadmin")
            .limit(10);
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.max_response_size, 1024);
        assert_eq!(config.auth_user.as_deref(), Some("omdadmin"));
        assert_eq!(config.limit, Some(10));
    }
}
