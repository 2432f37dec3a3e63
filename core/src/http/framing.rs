/*
 * framing.rs
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

//! Body framing: how the end of a message body is determined.

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::http::chunked::ChunkedDecoder;
use crate::http::error::HttpError;
use crate::http::message::Headers;
use crate::http::reader::MessageReader;

/// Framing mode for one message body. Decided once from the headers and
/// fixed for the life of the message.
///
/// Read-until-close framing is not supported; a message without a
/// Transfer-Encoding or Content-Length header has no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// No body follows the head.
    NoBody,
    /// Exactly this many body bytes follow.
    Length(u64),
    /// The body is a chunk sequence ended by a zero-size chunk.
    Chunked,
}

impl Framing {
    /// Decide the framing from a header mapping.
    ///
    /// Transfer-Encoding "chunked" takes priority over Content-Length.
    /// A Transfer-Encoding with any other value is ignored here.
    pub fn from_headers(headers: &Headers) -> Result<Framing, HttpError> {
        if let Some(te) = headers.get("Transfer-Encoding") {
            if te.trim() == "chunked" {
                return Ok(Framing::Chunked);
            }
        }
        if let Some(cl) = headers.get("Content-Length") {
            let n = cl
                .trim()
                .parse::<u64>()
                .map_err(|_| HttpError::InvalidContentLength(cl.to_string()))?;
            return Ok(Framing::Length(n));
        }
        Ok(Framing::NoBody)
    }

    /// Pull one complete body from the reader in this mode. NoBody and
    /// Length(0) complete without touching the transport.
    pub async fn read_body<S: AsyncRead + Unpin>(
        &self,
        reader: &mut MessageReader<S>,
    ) -> Result<Bytes, HttpError> {
        match self {
            Framing::NoBody => Ok(Bytes::new()),
            Framing::Length(n) => reader.read_exactly(*n as usize).await,
            Framing::Chunked => ChunkedDecoder::new().decode(reader).await,
        }
    }
}
