/*
 * error.rs
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

//! HTTP framing, parsing, and serving errors.

use std::fmt;
use std::io;

/// Errors from reading, framing, or serving one HTTP message.
#[derive(Debug)]
pub enum HttpError {
    /// A non-empty header line without a colon, or the head was not UTF-8.
    MalformedHeader(String),
    /// Content-Length present but not a non-negative integer.
    InvalidContentLength(String),
    /// Chunk-size line not valid hexadecimal, or chunk data cut short.
    MalformedChunk(String),
    /// End of stream before the current logical unit completed.
    ConnectionClosed,
    /// A blocking read exceeded the configured idle timeout.
    Timeout,
    /// The request target does not map to an existing resource.
    ResourceNotFound(String),
    /// Method or body encoding the server does not implement.
    Unsupported(String),
    /// Filesystem or other internal failure; the text appears in 500 bodies.
    Internal(String),
}

impl HttpError {
    /// Status code this error degrades to when the server must still answer.
    pub fn status_code(&self) -> u16 {
        match self {
            HttpError::MalformedHeader(_)
            | HttpError::InvalidContentLength(_)
            | HttpError::MalformedChunk(_)
            | HttpError::Unsupported(_) => 400,
            HttpError::ResourceNotFound(_) => 404,
            HttpError::ConnectionClosed | HttpError::Timeout | HttpError::Internal(_) => 500,
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::MalformedHeader(m) => write!(f, "malformed header: {}", m),
            HttpError::InvalidContentLength(v) => write!(f, "invalid Content-Length: {}", v),
            HttpError::MalformedChunk(m) => write!(f, "malformed chunk: {}", m),
            HttpError::ConnectionClosed => write!(f, "connection closed"),
            HttpError::Timeout => write!(f, "read timed out"),
            HttpError::ResourceNotFound(t) => write!(f, "resource not found: {}", t),
            HttpError::Unsupported(w) => write!(f, "unsupported: {}", w),
            HttpError::Internal(m) => write!(f, "{}", m),
        }
    }
}

impl std::error::Error for HttpError {}

impl From<io::Error> for HttpError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => HttpError::ConnectionClosed,
            io::ErrorKind::TimedOut => HttpError::Timeout,
            _ => HttpError::Internal(e.to_string()),
        }
    }
}
