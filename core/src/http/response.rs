/*
 * response.rs
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

//! Response head composition and canned error bodies.

use crate::http::date;

const SERVER_NAME: &str = concat!("fattorino/", env!("CARGO_PKG_VERSION"));

/// Reason phrase for the statuses the server emits.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        304 => "Not Modified",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Compose a complete response head for a status and body length:
/// status line, Date, Server, Content-Length, keep-alive Connection
/// header, blank-line terminated. Every line ends with CRLF. For HEAD
/// the length still describes the body a GET would have returned.
pub fn compose_head(status: u16, body_len: usize) -> String {
    let mut head = String::with_capacity(128);
    head.push_str(&format!("HTTP/1.1 {} {}\r\n", status, reason_phrase(status)));
    head.push_str(&format!("Date: {}\r\n", date::now_http_date()));
    head.push_str(&format!("Server: {}\r\n", SERVER_NAME));
    head.push_str(&format!("Content-Length: {}\r\n", body_len));
    head.push_str("Connection: keep-alive\r\n\r\n");
    head
}

/// Canned HTML body for an error status. A 500 carries the error text.
pub fn canned_body(status: u16, detail: Option<&str>) -> Vec<u8> {
    let inner = match (status, detail) {
        (_, Some(text)) => format!(
            "<h1>{} {}</h1><p>{}</p>",
            status,
            reason_phrase(status),
            text
        ),
        (404, None) => "<h1>404 Not Found</h1><p>The requested resource does not exist.</p>"
            .to_string(),
        (status, None) => format!("<h1>{} {}</h1>", status, reason_phrase(status)),
    };
    format!("<html><body>{}</body></html>", inner).into_bytes()
}
