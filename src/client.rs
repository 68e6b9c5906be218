//! Livestatus client
//!
//! This module provides [`Client`], which runs one composite query at a time
//! and returns the fully materialized result.
//!
//! # Example
//!
//! ```rust,no_run
//! use livestatus_rs::{Client, Parameters};
//!
//! # async fn example() -> livestatus_rs::Result<()> {
//! let client = Client::new();
//! let params = Parameters::new().with("state", "2");
//! let result = client
//!     .execute("mon.example.com 6557\nGET services\nColumns: host_name description state\nFilter: state = $P!{state}", &params)
//!     .await?;
//!
//! let mut cursor = result.into_cursor();
//! while cursor.advance() {
//!     println!("{} {}", cursor.value("host_name")?, cursor.value("description")?);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::column::{is_stats_column, ColumnInfo, ColumnMetadata};
use crate::config::Config;
use crate::constants::type_tag;
use crate::error::{Error, Phase, Result};
use crate::query::{CompositeQuery, Parameters};
use crate::request;
use crate::response::split_rows;
use crate::result::{QueryResult, ResultSet};
use crate::transport::TcpTransport;

/// Minimum fields in a row of the `columns` table
const METADATA_FIELDS: usize = 4;

/// Client for a Livestatus endpoint.
///
/// The client keeps no state between calls apart from the handle that lets
/// [`cancel`](Client::cancel) reach the socket of the running query. Share it
/// behind an `Arc` to cancel from another task.
#[derive(Debug, Default)]
pub struct Client {
    config: Config,
    busy: AtomicBool,
    active: Mutex<Option<CancellationToken>>,
}

/// Clears the in-flight markers however `execute` exits
struct InFlight<'a> {
    client: &'a Client,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.client.active.lock().take();
        self.client.busy.store(false, Ordering::Release);
    }
}

impl Client {
    /// Create a client with the default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a client with a custom configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            busy: AtomicBool::new(false),
            active: Mutex::new(None),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a query currently holds an open socket
    pub fn is_connected(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Run a composite query.
    ///
    /// The query is validated and parameters are substituted before any
    /// socket is opened. The socket is closed again before this returns,
    /// whatever the outcome.
    pub async fn execute(&self, query: &str, params: &Parameters) -> Result<QueryResult> {
        let query = CompositeQuery::parse(query, params)?;

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::QueryInProgress);
        }
        let _in_flight = InFlight { client: self };

        let target = query.target();
        let cancel = CancellationToken::new();
        let mut transport =
            TcpTransport::connect(target, self.config.connect_timeout, cancel.clone()).await?;
        *self.active.lock() = Some(cancel);
        tracing::debug!(host = %target.host, port = target.port, table = query.table(), "connected");

        let result = self.exchange(&mut transport, &query).await;
        transport.close().await;

        match &result {
            Ok(result) => tracing::debug!(
                host = %target.host,
                rows = result.row_count(),
                columns = result.metadata.len(),
                "query complete"
            ),
            Err(e) => tracing::debug!(host = %target.host, error = %e, "query failed"),
        }
        result
    }

    /// Abort the running query.
    ///
    /// Returns `true` if a socket was open and is now being closed; the
    /// pending `execute` then fails with [`Error::Cancelled`].
    pub fn cancel(&self) -> bool {
        match self.active.lock().as_ref() {
            Some(token) if !token.is_cancelled() => {
                tracing::debug!("cancelling query");
                token.cancel();
                true
            }
            _ => false,
        }
    }

    async fn exchange(
        &self,
        transport: &mut TcpTransport,
        query: &CompositeQuery,
    ) -> Result<QueryResult> {
        let mut metadata = self.fetch_metadata(transport, query.table()).await?;
        let result_set = self.fetch_rows(transport, query.body()).await?;

        // Stats columns are named by the query, not by the columns table
        for name in result_set.header() {
            if is_stats_column(name) && metadata.get(name).is_none() {
                metadata.insert(ColumnInfo::new(name, type_tag::FLOAT, ""));
            }
        }
        Ok(QueryResult::new(result_set, metadata))
    }

    async fn fetch_metadata(
        &self,
        transport: &mut TcpTransport,
        table: &str,
    ) -> Result<ColumnMetadata> {
        let req = request::metadata_request(table, &self.config);
        tracing::trace!(table, request = ?req, "sending metadata request");
        transport.send(&req, Phase::Metadata).await?;

        let lines = transport
            .receive(Phase::Metadata, self.config.max_response_size)
            .await?;
        Ok(parse_metadata(lines))
    }

    async fn fetch_rows(&self, transport: &mut TcpTransport, body: &str) -> Result<ResultSet> {
        let req = request::data_request(body, &self.config);
        tracing::trace!(request = ?req, "sending data request");
        transport.send(&req, Phase::Data).await?;

        let lines = transport
            .receive(Phase::Data, self.config.max_response_size)
            .await?;
        Ok(ResultSet::from_rows(split_rows(lines, true)))
    }
}

/// Build the lookup table from `columns` rows: description, name, table, type
fn parse_metadata(lines: Vec<String>) -> ColumnMetadata {
    let mut metadata = ColumnMetadata::new();
    for row in split_rows(lines, false) {
        if row.len() < METADATA_FIELDS {
            tracing::warn!(fields = row.len(), "skipping malformed column description");
            continue;
        }
        metadata.insert(ColumnInfo::new(&row[1], &row[3], &row[0]));
    }
    metadata
}
