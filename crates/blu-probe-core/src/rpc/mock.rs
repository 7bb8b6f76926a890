use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// A scripted byte stream for testing. Each queued chunk is returned by
/// exactly one read (split only if the reader's buffer is smaller); after
/// the last chunk the stream reports end-of-file, or never becomes ready if
/// built with `hang()`. Writes are captured for inspection, rejected with
/// `fail_writes()`, or never accepted with `stall_writes()`.
pub struct MockStream {
    reads: VecDeque<Vec<u8>>,
    hang_when_drained: bool,
    fail_writes: bool,
    stall_writes: bool,
    written: Vec<u8>,
}

impl MockStream {
    pub fn builder() -> MockStreamBuilder {
        MockStreamBuilder {
            reads: VecDeque::new(),
            hang_when_drained: false,
            fail_writes: false,
            stall_writes: false,
        }
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Captured writes, parsed as one JSON value per line.
    pub fn written_requests(&self) -> Vec<serde_json::Value> {
        self.written
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_slice(line).expect("written line must be JSON"))
            .collect()
    }
}

pub struct MockStreamBuilder {
    reads: VecDeque<Vec<u8>>,
    hang_when_drained: bool,
    fail_writes: bool,
    stall_writes: bool,
}

impl MockStreamBuilder {
    pub fn chunk(mut self, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        // An empty read means end-of-file, so empty chunks are not queued.
        if !data.is_empty() {
            self.reads.push_back(data);
        }
        self
    }

    pub fn hang(mut self) -> Self {
        self.hang_when_drained = true;
        self
    }

    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn stall_writes(mut self) -> Self {
        self.stall_writes = true;
        self
    }

    pub fn build(self) -> MockStream {
        MockStream {
            reads: self.reads,
            hang_when_drained: self.hang_when_drained,
            fail_writes: self.fail_writes,
            stall_writes: self.stall_writes,
            written: Vec::new(),
        }
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match this.reads.front_mut() {
            Some(chunk) => {
                let n = chunk.len().min(buf.remaining());
                buf.put_slice(&chunk[..n]);
                chunk.drain(..n);
                if chunk.is_empty() {
                    this.reads.pop_front();
                }
                Poll::Ready(Ok(()))
            }
            None if this.hang_when_drained => Poll::Pending,
            None => Poll::Ready(Ok(())),
        }
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.stall_writes {
            return Poll::Pending;
        }
        if this.fail_writes {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "mock stream rejects writes",
            )));
        }
        this.written.extend_from_slice(data);
        Poll::Ready(Ok(data.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
