/*
 * lib.rs
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

//! Fattorino core: a minimal HTTP/1.1 client and file-serving server
//! built directly on TCP byte streams.
//!
//! The interesting part is incremental message framing: heads, fixed
//! length bodies, and chunked bodies are recovered from a stream that
//! may fragment them arbitrarily. Everything else (the client, the
//! dispatcher, response composition) sits on top of that.

pub mod http;
pub mod server;
