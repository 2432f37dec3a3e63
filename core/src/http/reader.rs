/*
 * reader.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Fattorino, a minimal HTTP/1.1 client and server.
 *
 * Fattorino is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Fattorino is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Fattorino.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Buffered reads over a byte stream that may fragment data arbitrarily.
//!
//! The transport delivers bytes in whatever pieces it likes; a single
//! message head or body may arrive in one read or across many. The
//! reader accumulates residual bytes between calls so results depend
//! only on the byte sequence, never on how it was split.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

use crate::http::error::HttpError;

const READ_CHUNK: usize = 8192;

/// Pull-model reader for one connection.
///
/// Bytes read from the transport but not yet consumed stay in the
/// residual buffer and are served to later calls before the transport
/// is touched again.
pub struct MessageReader<S> {
    stream: S,
    buf: BytesMut,
    /// Deadline for each blocking transport read; None blocks indefinitely.
    idle_timeout: Option<Duration>,
    eof: bool,
}

impl<S: AsyncRead + Unpin> MessageReader<S> {
    pub fn new(stream: S) -> Self {
        MessageReader {
            stream,
            buf: BytesMut::with_capacity(READ_CHUNK),
            idle_timeout: None,
            eof: false,
        }
    }

    pub fn with_timeout(stream: S, idle_timeout: Duration) -> Self {
        MessageReader {
            stream,
            buf: BytesMut::with_capacity(READ_CHUNK),
            idle_timeout: Some(idle_timeout),
            eof: false,
        }
    }

    /// One transport read appended to the residual buffer.
    /// Ok(false) means end of stream.
    async fn fill(&mut self) -> Result<bool, HttpError> {
        if self.eof {
            return Ok(false);
        }
        let mut tmp = [0u8; READ_CHUNK];
        let n = match self.idle_timeout {
            Some(limit) => match timeout(limit, self.stream.read(&mut tmp)).await {
                Ok(res) => res?,
                Err(_) => return Err(HttpError::Timeout),
            },
            None => self.stream.read(&mut tmp).await?,
        };
        if n == 0 {
            self.eof = true;
            return Ok(false);
        }
        self.buf.extend_from_slice(&tmp[..n]);
        Ok(true)
    }

    /// Exactly `n` bytes, blocking until they are available. End of
    /// stream before the count is reached fails with ConnectionClosed.
    /// `n == 0` returns an empty buffer without touching the transport.
    pub async fn read_exactly(&mut self, n: usize) -> Result<Bytes, HttpError> {
        while self.buf.len() < n {
            if !self.fill().await? {
                return Err(HttpError::ConnectionClosed);
            }
        }
        Ok(self.buf.split_to(n).freeze())
    }

    /// Bytes up to and including the first CRLF CRLF. Anything read past
    /// the terminator stays in the residual buffer for later calls.
    ///
    /// Ok(None) means the stream ended cleanly before any byte of a new
    /// block; end of stream with a partial block is ConnectionClosed.
    pub async fn read_until_blank_line(&mut self) -> Result<Option<Bytes>, HttpError> {
        let mut searched = 0;
        loop {
            if let Some(pos) = find_blank_line(&self.buf, searched) {
                return Ok(Some(self.buf.split_to(pos + 4).freeze()));
            }
            // The terminator may straddle the next fill; back up so a
            // partial CRLF CRLF at the tail is rescanned.
            searched = self.buf.len().saturating_sub(3);
            if !self.fill().await? {
                return if self.buf.is_empty() {
                    Ok(None)
                } else {
                    Err(HttpError::ConnectionClosed)
                };
            }
        }
    }

    /// One CRLF-terminated line with the terminator stripped. Used for
    /// chunk-size lines and trailers, not for header blocks.
    pub async fn read_line(&mut self) -> Result<Bytes, HttpError> {
        let mut searched = 0;
        loop {
            if let Some(pos) = find_crlf(&self.buf, searched) {
                let mut line = self.buf.split_to(pos + 2);
                line.truncate(pos);
                return Ok(line.freeze());
            }
            searched = self.buf.len().saturating_sub(1);
            if !self.fill().await? {
                return Err(HttpError::ConnectionClosed);
            }
        }
    }

    /// Bytes buffered but not yet consumed.
    pub fn residual_len(&self) -> usize {
        self.buf.len()
    }
}

fn find_crlf(buf: &[u8], from: usize) -> Option<usize> {
    if buf.len() < 2 {
        return None;
    }
    let mut i = from;
    while i + 2 <= buf.len() {
        if buf[i] == b'\r' && buf[i + 1] == b'\n' {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn find_blank_line(buf: &[u8], from: usize) -> Option<usize> {
    if buf.len() < 4 {
        return None;
    }
    let mut i = from;
    while i + 4 <= buf.len() {
        if &buf[i..i + 4] == b"\r\n\r\n" {
            return Some(i);
        }
        i += 1;
    }
    None
}
