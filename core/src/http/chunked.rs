/*
 * chunked.rs
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

//! Chunked transfer decoding and encoding.
//!
//! Each chunk is a hexadecimal size line, CRLF, that many payload bytes,
//! CRLF. A zero-size chunk ends the body, optionally followed by trailer
//! lines and a final blank line. Chunk boundaries come from the declared
//! sizes alone; payload content is never inspected.

use bytes::{Bytes, BytesMut};
use tokio::io::AsyncRead;

use crate::http::error::HttpError;
use crate::http::reader::MessageReader;

/// Decoder phase. Size and data alternate until the zero-size chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    ReadSize,
    ReadData(u64),
    Done,
}

/// Pull-model decoder for one chunked body.
pub struct ChunkedDecoder {
    state: DecodeState,
    body: BytesMut,
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        ChunkedDecoder {
            state: DecodeState::ReadSize,
            body: BytesMut::new(),
        }
    }

    /// Decode one complete chunked body, leaving any bytes after the
    /// terminator in the reader for the next message.
    pub async fn decode<S: AsyncRead + Unpin>(
        mut self,
        reader: &mut MessageReader<S>,
    ) -> Result<Bytes, HttpError> {
        loop {
            match self.state {
                DecodeState::ReadSize => {
                    let line = reader.read_line().await.map_err(cut_short)?;
                    let size = parse_chunk_size(&line)?;
                    if size == 0 {
                        consume_trailers(reader).await?;
                        self.state = DecodeState::Done;
                    } else {
                        self.state = DecodeState::ReadData(size);
                    }
                }
                DecodeState::ReadData(size) => {
                    let data = reader.read_exactly(size as usize).await.map_err(cut_short)?;
                    self.body.extend_from_slice(&data);
                    let sep = reader.read_exactly(2).await.map_err(cut_short)?;
                    if &sep[..] != b"\r\n" {
                        return Err(HttpError::MalformedChunk(
                            "missing CRLF after chunk data".to_string(),
                        ));
                    }
                    self.state = DecodeState::ReadSize;
                }
                DecodeState::Done => return Ok(self.body.freeze()),
            }
        }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        ChunkedDecoder::new()
    }
}

/// Parse a chunk-size line. Text after the first ';' is a chunk
/// extension and is ignored.
fn parse_chunk_size(line: &[u8]) -> Result<u64, HttpError> {
    let text = std::str::from_utf8(line)
        .map_err(|_| HttpError::MalformedChunk("size line is not UTF-8".to_string()))?;
    let hex = match text.find(';') {
        Some(pos) => &text[..pos],
        None => text,
    };
    u64::from_str_radix(hex.trim(), 16)
        .map_err(|_| HttpError::MalformedChunk(format!("bad size line {:?}", text)))
}

/// Trailer lines up to the final blank line are read and discarded. A
/// peer that closes right after the zero-size chunk line is accepted.
async fn consume_trailers<S: AsyncRead + Unpin>(
    reader: &mut MessageReader<S>,
) -> Result<(), HttpError> {
    loop {
        match reader.read_line().await {
            Ok(line) if line.is_empty() => return Ok(()),
            Ok(_) => continue,
            Err(HttpError::ConnectionClosed) => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}

/// Encode a payload as a single chunk followed by the terminator. An
/// empty payload is just the terminator; a zero-size data chunk would
/// end the body early.
pub fn encode_chunked(payload: &[u8], out: &mut BytesMut) {
    if !payload.is_empty() {
        out.extend_from_slice(format!("{:x}\r\n", payload.len()).as_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\n\r\n");
}

fn cut_short(e: HttpError) -> HttpError {
    match e {
        HttpError::ConnectionClosed => {
            HttpError::MalformedChunk("body cut short by end of stream".to_string())
        }
        other => other,
    }
}
