//! TCP transport
//!
//! Owns the socket for one `execute` call. Every send and receive is raced
//! against the call's cancellation token so an abort from another task ends a
//! blocked read promptly.

use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, IoContext, Phase, Result};
use crate::query::Target;
use crate::response;

/// TCP transport for Livestatus requests
#[derive(Debug)]
pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    target: Target,
    cancel: CancellationToken,
}

impl TcpTransport {
    /// Connect to the target within `connect_timeout`
    pub async fn connect(
        target: &Target,
        connect_timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let connect = TcpStream::connect((target.host.as_str(), target.port));
        let stream = timeout(connect_timeout, connect)
            .await
            .map_err(|_| Error::ConnectionTimeout {
                host: target.host.clone(),
                port: target.port,
                timeout: connect_timeout,
            })?
            .map_err(|source| Error::Connection {
                host: target.host.clone(),
                port: target.port,
                source,
            })?;

        stream
            .set_nodelay(true)
            .map_err(|e| context(target, Phase::Connect).wrap(e))?;

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            target: target.clone(),
            cancel,
        })
    }

    /// Write a complete request
    pub async fn send(&mut self, request: &[u8], phase: Phase) -> Result<()> {
        let cancel = self.cancel.clone();
        let ctx = context(&self.target, phase);
        let writer = &mut self.writer;
        let write = async {
            writer.write_all(request).await?;
            writer.flush().await?;
            Ok::<_, std::io::Error>(())
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = write => result.map_err(|e| translate(&cancel, ctx.wrap(e))),
        }
    }

    /// Read one framed response and return its payload lines
    pub async fn receive(&mut self, phase: Phase, max_response_size: usize) -> Result<Vec<String>> {
        let cancel = self.cancel.clone();
        let ctx = context(&self.target, phase);
        let read = response::read_response(&mut self.reader, max_response_size, &ctx);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = read => result.map_err(|e| translate(&cancel, e)),
        }
    }

    /// Shut down and release the socket
    pub async fn close(self) {
        let Self { reader, mut writer, .. } = self;
        if let Err(e) = writer.shutdown().await {
            tracing::trace!(error = %e, "shutdown failed, dropping socket");
        }
        drop(reader);
        drop(writer);
    }
}

/// An I/O failure that raced a cancel is reported as the cancel
fn translate(cancel: &CancellationToken, err: Error) -> Error {
    if cancel.is_cancelled() && matches!(err, Error::Io { .. }) {
        Error::Cancelled
    } else {
        err
    }
}

fn context(target: &Target, phase: Phase) -> IoContext<'_> {
    IoContext {
        phase,
        host: &target.host,
        port: target.port,
    }
}
