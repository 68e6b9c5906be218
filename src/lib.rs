#![warn(missing_docs)]

//! # livestatus-rs
//!
//! An async client for the Livestatus query protocol spoken by Nagios, Icinga
//! and Checkmk monitoring cores.
//!
//! A query is a single *composite* string: the first line names the endpoint,
//! the remaining lines are LQL. Each call opens a socket, asks the `columns`
//! table for the queried table's column types and descriptions, runs the
//! query, closes the socket and hands back the rows fully materialized.
//!
//! ## Features
//!
//! - **Deterministic framing** - always requests the fixed16 response header
//!   and CSV output, whatever the server's defaults
//! - **Parameter substitution** - `$P{name}` (quoted) and `$P!{name}` (raw)
//! - **Typed cells** - `int`, `float` and `list` columns are coerced on access
//! - **Cancellation** - abort a running query from another task
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use livestatus_rs::{Client, Parameters};
//!
//! #[tokio::main]
//! async fn main() -> livestatus_rs::Result<()> {
//!     let client = Client::new();
//!     let result = client
//!         .execute("localhost 6557\nGET hosts\nColumns: name state", &Parameters::new())
//!         .await?;
//!
//!     let mut cursor = result.into_cursor();
//!     while cursor.advance() {
//!         let name = cursor.value("name")?;
//!         let state = cursor.value("state")?;
//!         println!("{}: {}", name, state);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Cancelling
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use livestatus_rs::{Client, Error, Parameters};
//!
//! # async fn example() {
//! let client = Arc::new(Client::new());
//! let worker = Arc::clone(&client);
//! let handle = tokio::spawn(async move {
//!     worker.execute("localhost 6557\nGET log", &Parameters::new()).await
//! });
//!
//! client.cancel();
//! if let Ok(Err(Error::Cancelled)) = handle.await {
//!     println!("aborted");
//! }
//! # }
//! ```
//!
//! ## Column Types
//!
//! | Livestatus type | [`Value`] variant |
//! |-----------------|-------------------|
//! | `int`           | `Value::Integer(i64)` |
//! | `float`, any `stats_*` column | `Value::Float(f64)` |
//! | `list`          | `Value::List(Vec<String>)` |
//! | anything else   | `Value::String(String)` |

pub mod client;
pub mod column;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod query;
pub mod request;
pub mod response;
pub mod result;
pub mod row;
pub mod transport;

// Re-export commonly used types
pub use client::Client;
pub use column::{ColumnInfo, ColumnMetadata, ColumnType};
pub use config::Config;
pub use cursor::RowCursor;
pub use error::{Error, Phase, Result};
pub use query::{lqencode, CompositeQuery, Parameters, Target};
pub use response::ResponseHeader;
pub use result::{QueryResult, ResultSet};
pub use row::Value;
