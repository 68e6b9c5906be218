//! Livestatus protocol constants
//!
//! Separators, request directives and limits used on the wire. These are not
//! configurable per call: the client always asks for the fixed16 header and
//! CSV output so framing does not depend on the server's defaults.

use std::time::Duration;

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on the declared payload length (10 MiB)
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Status code of a successful response
pub const STATUS_OK: u16 = 200;

/// Columns with this prefix are aggregates and always numeric
pub const STATS_PREFIX: &str = "stats_";

/// Pseudo-table describing every column of every table
pub const COLUMNS_TABLE: &str = "columns";

/// Separator codes requested from the server
pub mod separator {
    /// Between rows
    pub const LINE: u8 = 10;
    /// Between fields of a row
    pub const FIELD: u8 = 1;
    /// Between sub-values of a field
    pub const VALUE: u8 = 44;
    /// Between items of a list-typed cell
    pub const LIST: u8 = 124;

    /// Value of the `Separators:` directive
    pub fn directive() -> String {
        format!("{} {} {} {}", LINE, FIELD, VALUE, LIST)
    }
}

/// Request header directives
pub mod directive {
    /// Table selection verb
    pub const GET: &str = "GET";
    /// Row filter
    pub const FILTER: &str = "Filter:";
    /// Toggle the header row
    pub const COLUMN_HEADERS: &str = "ColumnHeaders:";
    /// Response header mode
    pub const RESPONSE_HEADER: &str = "ResponseHeader:";
    /// Body encoding
    pub const OUTPUT_FORMAT: &str = "OutputFormat:";
    /// Separator codes
    pub const SEPARATORS: &str = "Separators:";
    /// Keep the connection open after the response
    pub const KEEP_ALIVE: &str = "KeepAlive:";
    /// Contact the query runs on behalf of
    pub const AUTH_USER: &str = "AuthUser:";
    /// Maximum number of rows
    pub const LIMIT: &str = "Limit:";

    /// Fixed-size status/length header
    pub const FIXED16: &str = "fixed16";
    /// Separator-delimited output
    pub const CSV: &str = "csv";
}

/// Column type tags reported by the `columns` table
pub mod type_tag {
    /// Signed integer
    pub const INT: &str = "int";
    /// Floating point
    pub const FLOAT: &str = "float";
    /// List of strings
    pub const LIST: &str = "list";
    /// Anything else
    pub const STRING: &str = "string";
}
