/*
 * mod.rs
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

//! HTTP/1.1 engine over raw byte streams.
//!
//! Design:
//! - Pull-model reads: `MessageReader` owns the residual buffer, so parse
//!   results depend only on the byte sequence, never on how the transport
//!   fragmented it.
//! - Buffers: `bytes` crate (BytesMut for accumulation, Bytes for
//!   complete heads and bodies).
//! - Framing is decided once per message from Transfer-Encoding and
//!   Content-Length; chunk boundaries come from declared sizes alone.
//! - No TLS, no HTTP/2, no read-until-close bodies.

pub mod chunked;
pub mod date;
pub mod error;
pub mod framing;
pub mod message;
pub mod reader;
pub mod request;
pub mod response;

pub use error::HttpError;
pub use framing::Framing;
pub use message::{Headers, Message};
pub use reader::MessageReader;
pub use request::{Method, RequestBuilder};

pub mod client;

pub use client::{HttpClient, HttpConnection};
