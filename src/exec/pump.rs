// src/exec/pump.rs

//! Stream pump: drains one child pipe into a [`FanOut`].

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::streams::FanOut;
use crate::types::Stream;

/// What a finished pump hands back to the controller.
///
/// The fan-out is returned unclosed; the controller closes it once the
/// process has exited so that line relays flush their remainders.
pub struct PumpOutcome {
    pub stream: Stream,
    pub fanout: FanOut,
    /// Bytes copied, or the first read/write error.
    pub result: io::Result<u64>,
}

/// Copy `reader` into `fanout` until EOF or the first error.
///
/// On error the reader is dropped, closing our end of the pipe so a child
/// that keeps writing gets `EPIPE` instead of blocking forever.
pub async fn pump<R>(stream: Stream, mut reader: R, mut fanout: FanOut, buf_size: usize) -> PumpOutcome
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; buf_size.max(1)];
    let mut copied: u64 = 0;

    let result = loop {
        match reader.read(&mut buf).await {
            Ok(0) => break Ok(copied),
            Ok(n) => {
                if let Err(err) = fanout.write_chunk(&buf[..n]) {
                    break Err(err);
                }
                copied += n as u64;
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => break Err(err),
        }
    };

    match &result {
        Ok(bytes) => debug!(%stream, bytes, "stream reached EOF"),
        Err(err) => warn!(%stream, bytes = copied, error = %err, "stream pump stopped"),
    }

    PumpOutcome {
        stream,
        fanout,
        result,
    }
}

/// Run [`pump`] as its own Tokio task.
pub(crate) fn spawn_pump<R>(
    stream: Stream,
    reader: R,
    fanout: FanOut,
    buf_size: usize,
) -> JoinHandle<PumpOutcome>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(pump(stream, reader, fanout, buf_size))
}
