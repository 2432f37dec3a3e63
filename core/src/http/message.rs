/*
 * message.rs
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

//! HTTP message model: start line, ordered header mapping, body.

use bytes::Bytes;

use crate::http::error::HttpError;

/// Ordered header mapping.
///
/// Names are kept as received, without case normalization; lookups are
/// exact matches. Setting a name that is already present replaces its
/// value in place, so repeated headers collapse to the last value seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Headers { entries: Vec::new() }
    }

    /// Insert or replace a header. Last write wins.
    pub fn set(&mut self, name: &str, value: &str) {
        for entry in self.entries.iter_mut() {
            if entry.0 == name {
                entry.1 = value.to_string();
                return;
            }
        }
        self.entries.push((name.to_string(), value.to_string()));
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One HTTP message, request or response.
///
/// The start line is kept verbatim; request and response accessors parse
/// it on demand. The body is not mutated once complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub start_line: String,
    pub headers: Headers,
    pub body: Bytes,
}

impl Message {
    pub fn new(start_line: impl Into<String>) -> Self {
        Message {
            start_line: start_line.into(),
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Parse a complete header block: start line, zero or more header
    /// lines, terminated by a blank line. The trailing blank line may be
    /// present or already stripped.
    ///
    /// Each header line is split at the first colon; name and value are
    /// trimmed of surrounding whitespace. A non-empty line without a colon
    /// fails the whole block.
    pub fn parse_head(block: &[u8]) -> Result<Message, HttpError> {
        let text = std::str::from_utf8(block)
            .map_err(|_| HttpError::MalformedHeader("header block is not UTF-8".to_string()))?;
        let mut lines = text.split("\r\n");
        let start_line = match lines.next() {
            Some(line) if !line.trim().is_empty() => line.trim_end().to_string(),
            _ => return Err(HttpError::MalformedHeader("empty start line".to_string())),
        };
        let mut headers = Headers::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            match line.find(':') {
                Some(pos) => {
                    let name = line[..pos].trim();
                    let value = line[pos + 1..].trim();
                    headers.set(name, value);
                }
                None => {
                    return Err(HttpError::MalformedHeader(format!(
                        "header line without colon: {:?}",
                        line
                    )));
                }
            }
        }
        Ok(Message {
            start_line,
            headers,
            body: Bytes::new(),
        })
    }

    /// Serialize the start line and headers, blank-line terminated.
    /// Parsing the result reproduces the same start line and mapping.
    pub fn serialize_head(&self) -> String {
        let mut head = String::with_capacity(self.start_line.len() + self.headers.len() * 32 + 4);
        head.push_str(&self.start_line);
        head.push_str("\r\n");
        for (name, value) in self.headers.iter() {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");
        head
    }

    /// Request method, the first start-line token.
    pub fn method(&self) -> Option<&str> {
        self.start_line.split_whitespace().next()
    }

    /// Request target, the second start-line token.
    pub fn target(&self) -> Option<&str> {
        self.start_line.split_whitespace().nth(1)
    }

    /// Protocol version of a request line, the third token.
    pub fn version(&self) -> Option<&str> {
        self.start_line.split_whitespace().nth(2)
    }

    /// Status code of a response start line. The second whitespace token
    /// is parsed as a number; anything else yields None.
    pub fn status_code(&self) -> Option<u16> {
        self.start_line
            .split_whitespace()
            .nth(1)
            .and_then(|t| t.parse::<u16>().ok())
    }

    /// Reason phrase of a response start line, possibly empty.
    pub fn reason(&self) -> Option<&str> {
        let rest = self.start_line.trim_start();
        let rest = rest.splitn(2, char::is_whitespace).nth(1)?.trim_start();
        rest.splitn(2, char::is_whitespace).nth(1).map(|r| r.trim())
    }
}
