//! Newline framing for the incoming byte stream.
//!
//! Bytes from each socket read are appended to a single `BytesMut`; every
//! complete `\n`-terminated line is split off and handed back, and the
//! unterminated tail stays buffered for the next read. Framing works on raw
//! bytes so a multi-byte UTF-8 character split across two reads is
//! reassembled before any line is decoded.

use bytes::{Bytes, BytesMut};

use crate::error::RpcError;

/// Default upper bound for a single unterminated line (16 MiB).
pub const DEFAULT_MAX_LINE_LEN: usize = 16 * 1024 * 1024;

/// Per-connection accumulator for partially received lines.
#[derive(Debug)]
pub struct LineBuffer {
    buffer: BytesMut,
    /// Prefix of `buffer` already known to contain no `\n`.
    scanned: usize,
    max_line_len: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }

    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(8 * 1024),
            scanned: 0,
            max_line_len,
        }
    }

    /// Append a chunk and return every line it completed, without the
    /// trailing newline.
    ///
    /// Fails if the remaining unterminated tail grows past the line limit.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Bytes>, RpcError> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(offset) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
            let pos = self.scanned + offset;
            let mut line = self.buffer.split_to(pos + 1);
            line.truncate(pos);
            lines.push(line.freeze());
            self.scanned = 0;
        }
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_line_len {
            return Err(RpcError::LineTooLong {
                limit: self.max_line_len,
            });
        }
        Ok(lines)
    }

    /// Drop whatever is buffered.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scanned = 0;
    }

    /// Remove and return the buffered tail, lossily decoded.
    pub fn take_lossy(&mut self) -> String {
        let tail = self.buffer.split();
        self.scanned = 0;
        String::from_utf8_lossy(&tail).into_owned()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
