//! Request encoding
//!
//! Both requests are newline-separated header lines terminated by an empty
//! line:
//!
//! ```text
//! GET columns                       <LQL body>
//! Filter: table = hosts             ColumnHeaders: on
//! ColumnHeaders: off                ResponseHeader: fixed16
//! ResponseHeader: fixed16           Separators: 10 1 44 124
//! OutputFormat: csv                 OutputFormat: csv
//! Separators: 10 1 44 124
//! KeepAlive: on
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::Config;
use crate::constants::{directive, separator, COLUMNS_TABLE};

/// Builder for one request
#[derive(Debug, Default)]
struct RequestBuffer {
    buf: BytesMut,
}

impl RequestBuffer {
    fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, text: &str) -> &mut Self {
        self.buf.put_slice(text.as_bytes());
        self.buf.put_u8(separator::LINE);
        self
    }

    fn header(&mut self, name: &str, value: &str) -> &mut Self {
        self.buf.put_slice(name.as_bytes());
        self.buf.put_u8(b' ');
        self.line(value)
    }

    fn auth_user(&mut self, config: &Config) -> &mut Self {
        if let Some(user) = &config.auth_user {
            self.header(directive::AUTH_USER, user);
        }
        self
    }

    fn extra_headers(&mut self, config: &Config) -> &mut Self {
        for line in &config.headers {
            self.line(line);
        }
        self
    }

    fn finish(&mut self) -> Bytes {
        self.buf.put_u8(separator::LINE);
        self.buf.split().freeze()
    }
}

/// Request describing the columns of `table`
pub fn metadata_request(table: &str, config: &Config) -> Bytes {
    let mut req = RequestBuffer::new();
    req.line(&format!("{} {}", directive::GET, COLUMNS_TABLE))
        .header(directive::FILTER, &format!("table = {}", table))
        .header(directive::COLUMN_HEADERS, "off")
        .header(directive::RESPONSE_HEADER, directive::FIXED16)
        .header(directive::OUTPUT_FORMAT, directive::CSV)
        .header(directive::SEPARATORS, &separator::directive())
        .auth_user(config)
        .extra_headers(config)
        .header(directive::KEEP_ALIVE, "on");
    req.finish()
}

/// Request for the caller's LQL body with framing directives appended
pub fn data_request(body: &str, config: &Config) -> Bytes {
    let mut req = RequestBuffer::new();
    for line in body.lines() {
        req.line(line);
    }
    if let Some(limit) = config.limit {
        req.header(directive::LIMIT, &limit.to_string());
    }
    req.header(directive::COLUMN_HEADERS, "on")
        .header(directive::RESPONSE_HEADER, directive::FIXED16)
        .header(directive::SEPARATORS, &separator::directive())
        .header(directive::OUTPUT_FORMAT, directive::CSV)
        .auth_user(config)
        .extra_headers(config);
    req.finish()
}
