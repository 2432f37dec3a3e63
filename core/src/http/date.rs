/*
 * date.rs
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

//! HTTP dates for the Date header and If-Modified-Since comparisons.

use std::time::SystemTime;

use chrono::{DateTime, Utc};

/// Format a time as an IMF fixdate, e.g. "Tue, 25 Aug 2026 10:00:00 GMT".
pub fn format_http_date(t: SystemTime) -> String {
    let dt: DateTime<Utc> = t.into();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Current time as an IMF fixdate.
pub fn now_http_date() -> String {
    format_http_date(SystemTime::now())
}

/// Parse an HTTP date header value. Fixdates are valid RFC 2822 dates
/// with GMT as an obsolete zone name, so the RFC 2822 parser covers them.
/// Unparseable input yields None.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(SystemTime::from)
}
