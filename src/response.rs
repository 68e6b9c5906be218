//! Response decoding
//!
//! With `ResponseHeader: fixed16` every response starts with a status line:
//!
//! ```text
//! 200          1234
//! ^^^          ^^^^
//! status       payload length in bytes, header line excluded
//! ```
//!
//! Only the first and last tokens carry meaning. The payload is a sequence of
//! newline-terminated rows whose fields are split on the field separator.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::constants::{separator, STATUS_OK};
use crate::error::{Error, IoContext, Result};

/// Longest status line accepted; `fixed16` headers are 16 bytes
const MAX_HEADER_LINE: usize = 256;

/// Parsed status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Three-digit status code
    pub status: u16,
    /// Declared payload length
    pub length: usize,
    /// Text between status and length, if any
    pub text: String,
}

impl ResponseHeader {
    /// Parse a status line
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(Error::MalformedResponse(format!(
                "expected '<status> <length>' header, got {:?}",
                line
            )));
        }

        let status_token = tokens[0];
        let status = match status_token.parse::<u16>() {
            Ok(status) if status_token.len() == 3 => status,
            _ => {
                return Err(Error::MalformedResponse(format!(
                    "invalid status code {:?}",
                    status_token
                )))
            }
        };

        let length_token = tokens[tokens.len() - 1];
        let length = length_token.parse::<usize>().map_err(|_| {
            Error::MalformedResponse(format!("invalid payload length {:?}", length_token))
        })?;

        Ok(Self {
            status,
            length,
            text: tokens[1..tokens.len() - 1].join(" "),
        })
    }

    /// Check if the server accepted the query
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Read one line; `None` at end of stream
async fn read_line<R>(reader: &mut R, ctx: &IoContext<'_>) -> Result<Option<(String, usize)>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let consumed = reader
        .read_until(separator::LINE, &mut buf)
        .await
        .map_err(|e| ctx.wrap(e))?;
    if consumed == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&separator::LINE) {
        buf.pop();
    }
    Ok(Some((String::from_utf8_lossy(&buf).into_owned(), consumed)))
}

/// Read exactly `length` bytes as lines, or fewer if the stream ends.
///
/// A line cut off at `length` is kept as the last, partial line. A short
/// stream is not an error; the server may close early.
async fn read_lines<R>(reader: &mut R, length: usize, ctx: &IoContext<'_>) -> Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = reader.take(length as u64);
    let mut lines = Vec::new();
    let mut consumed = 0;
    while let Some((line, n)) = read_line(&mut body, ctx).await? {
        consumed += n;
        lines.push(line);
    }
    if consumed < length {
        tracing::debug!(consumed, length, "response ended before declared length");
    }
    Ok(lines)
}

/// Read and check the status line
pub(crate) async fn read_header<R>(reader: &mut R, ctx: &IoContext<'_>) -> Result<ResponseHeader>
where
    R: AsyncBufRead + Unpin,
{
    let mut bounded = reader.take(MAX_HEADER_LINE as u64);
    let mut buf = Vec::new();
    let consumed = bounded
        .read_until(separator::LINE, &mut buf)
        .await
        .map_err(|e| ctx.wrap(e))?;
    if consumed == 0 {
        return Err(Error::MalformedResponse(
            "connection closed before response header".to_string(),
        ));
    }
    if buf.pop() != Some(separator::LINE) {
        return Err(Error::MalformedResponse(format!(
            "response header not terminated within {} bytes",
            MAX_HEADER_LINE
        )));
    }
    let line = String::from_utf8_lossy(&buf);
    let header = ResponseHeader::parse(&line)?;
    tracing::trace!(status = header.status, length = header.length, "response header");
    Ok(header)
}

/// Read a complete response and return its payload lines.
///
/// Non-200 responses become [`Error::Server`] carrying the payload text, or
/// the header text when the payload is empty.
pub(crate) async fn read_response<R>(
    reader: &mut R,
    max_response_size: usize,
    ctx: &IoContext<'_>,
) -> Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let header = read_header(reader, ctx).await?;

    if !header.is_ok() {
        let body = read_lines(reader, header.length.min(max_response_size), ctx).await?;
        let body = body.join("\n");
        let message = match body.trim() {
            "" => header.text,
            text => text.to_string(),
        };
        return Err(Error::server(header.status, message));
    }

    if header.length > max_response_size {
        return Err(Error::ResponseTooLarge {
            declared: header.length,
            limit: max_response_size,
        });
    }

    read_lines(reader, header.length, ctx).await
}

/// Split payload lines into rows of cells.
///
/// With `with_header`, the first line names the columns and data rows short
/// of cells are padded with empty strings.
pub fn split_rows(lines: Vec<String>, with_header: bool) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = lines
        .iter()
        .map(|line| {
            line.split(separator::FIELD as char)
                .map(str::to_string)
                .collect()
        })
        .collect();

    if with_header {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        for row in rows.iter_mut().skip(1) {
            if row.len() < width {
                row.resize(width, String::new());
            }
        }
    }
    rows
}
