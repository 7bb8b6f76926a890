use std::io;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

use crate::error::{CoreError, RpcError};

use super::framing::LineBuffer;
use super::protocol::{parse_message, JsonRpcRequest, RpcMessage, RpcResponse};

/// Bytes requested from the stream per read.
const READ_CHUNK_SIZE: usize = 4096;

/// Line-delimited JSON-RPC over an already established byte stream.
///
/// One request is in flight at a time: callers alternate [`send`] and
/// [`receive_matching`], which `&mut self` enforces. Each
/// `receive_matching` call moves through
/// `awaiting-data -> parsing-line* -> matched | connection-closed | timed-out`.
///
/// Messages that arrive while waiting and do not answer the awaited id
/// (notifications, replies to other ids) are not queued for later calls;
/// the ones seen during the most recent call are kept for inspection via
/// [`unmatched`].
///
/// [`send`]: FramedRpcClient::send
/// [`receive_matching`]: FramedRpcClient::receive_matching
/// [`unmatched`]: FramedRpcClient::unmatched
#[derive(Debug)]
pub struct FramedRpcClient<S> {
    stream: S,
    buffer: LineBuffer,
    timeout: Duration,
    unmatched: Vec<RpcMessage>,
}

impl<S> FramedRpcClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap `stream`. `timeout` bounds every individual write and read.
    pub fn new(stream: S, timeout: Duration) -> Self {
        Self {
            stream,
            buffer: LineBuffer::new(),
            timeout,
            unmatched: Vec::new(),
        }
    }

    /// Replace the line buffer with one bounded at `max_line_len` bytes.
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.buffer = LineBuffer::with_max_line_len(max_line_len);
        self
    }

    /// Write one request line. The line is written with a single
    /// `write_all` and flushed before returning.
    pub async fn send(&mut self, method: &str, params: &[Value], id: u64) -> Result<(), CoreError> {
        let request = JsonRpcRequest { id, method, params };
        let mut line = serde_json::to_vec(&request).map_err(|e| RpcError::Transport(e.into()))?;
        line.push(b'\n');

        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc send"
        );

        let timeout = self.timeout;
        let stream = &mut self.stream;
        let write = async move {
            stream.write_all(&line).await?;
            stream.flush().await
        };
        match tokio::time::timeout(timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(RpcError::Transport(e).into()),
            Err(_) => Err(RpcError::Transport(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("write did not complete within {timeout:?}"),
            ))
            .into()),
        }
    }

    /// Read until a response whose `id` equals `id` arrives and return it.
    ///
    /// Malformed lines are logged and skipped. Once the match is found,
    /// anything still buffered behind it is discarded.
    pub async fn receive_matching(&mut self, id: u64) -> Result<RpcResponse, CoreError> {
        self.unmatched.clear();
        let timeout = self.timeout;
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            let read = tokio::time::timeout(timeout, self.stream.read(&mut chunk))
                .await
                .map_err(|_| RpcError::TimedOut(timeout))?
                .map_err(RpcError::Transport)?;

            if read == 0 {
                let partial = self.buffer.take_lossy();
                debug!(
                    rpc.id = id,
                    unmatched = self.unmatched.len(),
                    partial_len = partial.len(),
                    "stream closed before matching response"
                );
                return Err(RpcError::ConnectionClosed { partial }.into());
            }

            for line in self.buffer.push(&chunk[..read])? {
                match parse_message(&line) {
                    Ok(None) => {}
                    Ok(Some(RpcMessage::Response(response))) if response.answers(id) => {
                        trace!(
                            rpc.id = id,
                            body = %String::from_utf8_lossy(&line),
                            "rpc response body"
                        );
                        if !self.buffer.is_empty() {
                            debug!(
                                rpc.id = id,
                                discarded = self.buffer.len(),
                                "discarding data buffered after matching response"
                            );
                        }
                        self.buffer.clear();
                        return Ok(response);
                    }
                    Ok(Some(message)) => {
                        debug!(rpc.id = id, message = ?message, "skipping unmatched message");
                        self.unmatched.push(message);
                    }
                    Err(reason) => {
                        warn!(
                            rpc.id = id,
                            %reason,
                            line = %String::from_utf8_lossy(&line),
                            "skipping malformed line"
                        );
                    }
                }
            }
        }
    }

    /// Messages skipped during the most recent [`receive_matching`] call.
    ///
    /// [`receive_matching`]: FramedRpcClient::receive_matching
    pub fn unmatched(&self) -> &[RpcMessage] {
        &self.unmatched
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }
}
