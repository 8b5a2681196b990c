//! Incremental line framing over an arbitrarily chunked byte stream.
//!
//! Chunks are accumulated as raw bytes and split on `\n`. A newline byte
//! never appears inside a multi-byte UTF-8 sequence, so a character that
//! straddles two chunks is reassembled before its line is decoded.

use bytes::BytesMut;

/// Accumulates bytes, yields complete lines, retains the unterminated tail.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: BytesMut,
    // Prefix of `buf` already known to contain no newline.
    scanned: usize,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk to the buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Take the next complete line, without its `\n` (or `\r\n`) terminator.
    ///
    /// Returns `None` when only a partial line (or nothing) is buffered.
    pub fn next_line(&mut self) -> Option<String> {
        let Some(offset) = self.buf[self.scanned..].iter().position(|&b| b == b'\n') else {
            self.scanned = self.buf.len();
            return None;
        };
        let pos = self.scanned + offset;
        self.scanned = 0;
        let line = self.buf.split_to(pos + 1);
        let mut content = &line[..pos];
        if let Some(stripped) = content.strip_suffix(b"\r") {
            content = stripped;
        }
        Some(String::from_utf8_lossy(content).into_owned())
    }

    /// Bytes of the partial line currently held back.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
