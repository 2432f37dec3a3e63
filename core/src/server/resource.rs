/*
 * resource.rs
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

//! Mapping request targets onto files under the served root.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use percent_encoding::percent_decode_str;

use crate::http::date;
use crate::http::error::HttpError;

/// Map a GET/HEAD target onto a path under the root. The query part is
/// dropped, percent escapes are decoded, and any ".." is removed so the
/// result cannot climb out of the root. "/" maps to the default
/// document; a final segment without an extension gets ".html".
pub fn resolve_target(root: &Path, target: &str, default_doc: &str) -> PathBuf {
    let mut name = clean_target(target);
    if name.is_empty() {
        name = default_doc.to_string();
    } else if !name.rsplit('/').next().unwrap_or("").contains('.') {
        name.push_str(".html");
    }
    root.join(name)
}

/// Target mapping for POST/PUT-style writes: no ".html" defaulting, and
/// "/" maps to "index.txt".
pub fn resolve_write_target(root: &Path, target: &str) -> PathBuf {
    let name = clean_target(target);
    if name.is_empty() {
        root.join("index.txt")
    } else {
        root.join(name)
    }
}

fn clean_target(target: &str) -> String {
    let path = match target.find('?') {
        Some(pos) => &target[..pos],
        None => target,
    };
    let decoded = percent_decode_str(path).decode_utf8_lossy().replace("..", "");
    decoded.trim_start_matches('/').to_string()
}

/// Load a resource for GET/HEAD along with its modification time. A
/// path that is not a regular file is ResourceNotFound.
pub fn load_resource(path: &Path) -> Result<(Bytes, Option<SystemTime>), HttpError> {
    if !path.is_file() {
        return Err(HttpError::ResourceNotFound(path.display().to_string()));
    }
    let data = fs::read(path).map_err(|e| HttpError::Internal(e.to_string()))?;
    let modified = fs::metadata(path).ok().and_then(|m| m.modified().ok());
    Ok((Bytes::from(data), modified))
}

/// Append a request body to the target file, creating it (and missing
/// parent directories) first if needed. Appends from concurrent
/// connections are not serialized against each other.
pub fn append_resource(path: &Path, body: &[u8]) -> Result<(), HttpError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| HttpError::Internal(e.to_string()))?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| HttpError::Internal(e.to_string()))?;
    file.write_all(body)
        .map_err(|e| HttpError::Internal(e.to_string()))?;
    Ok(())
}

/// Store a PUT body as a new timestamp-named text file under the root.
/// An existing file with the same name is overwritten.
pub fn create_timestamped(root: &Path, body: &[u8]) -> Result<PathBuf, HttpError> {
    let name = format!("{}.txt", chrono::Local::now().format("%d %b %Y %H-%M-%S"));
    let path = root.join(name);
    fs::write(&path, body).map_err(|e| HttpError::Internal(e.to_string()))?;
    Ok(path)
}

/// If-Modified-Since check: true when the file has not changed since the
/// header time. An unparseable header value disables the check.
pub fn not_modified(modified: Option<SystemTime>, header_value: &str) -> bool {
    match (modified, date::parse_http_date(header_value)) {
        (Some(mtime), Some(since)) => mtime <= since,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn root_target_maps_to_default_doc() {
        let path = resolve_target(Path::new("web"), "/", "index.html");
        assert_eq!(path, Path::new("web").join("index.html"));
    }

    #[test]
    fn extensionless_target_gets_html() {
        let path = resolve_target(Path::new("web"), "/about", "index.html");
        assert_eq!(path, Path::new("web").join("about.html"));
    }

    #[test]
    fn extension_is_kept() {
        let path = resolve_target(Path::new("web"), "/style.css", "index.html");
        assert_eq!(path, Path::new("web").join("style.css"));
    }

    #[test]
    fn query_part_is_dropped() {
        let path = resolve_target(Path::new("web"), "/search.html?q=x", "index.html");
        assert_eq!(path, Path::new("web").join("search.html"));
    }

    #[test]
    fn percent_escapes_are_decoded() {
        let path = resolve_target(Path::new("web"), "/my%20page.html", "index.html");
        assert_eq!(path, Path::new("web").join("my page.html"));
    }

    #[test]
    fn dotdot_cannot_escape_root() {
        let path = resolve_target(Path::new("web"), "/../../etc/passwd", "index.html");
        assert!(path.starts_with("web"));
        assert!(!path.to_string_lossy().contains(".."));
        // Encoded traversal is decoded first, then stripped the same way.
        let path = resolve_target(Path::new("web"), "/%2e%2e/secret.txt", "index.html");
        assert!(!path.to_string_lossy().contains(".."));
    }

    #[test]
    fn write_target_root_is_index_txt() {
        let path = resolve_write_target(Path::new("web"), "/");
        assert_eq!(path, Path::new("web").join("index.txt"));
    }

    #[test]
    fn write_target_keeps_extensionless_name() {
        let path = resolve_write_target(Path::new("web"), "/notes");
        assert_eq!(path, Path::new("web").join("notes"));
    }

    #[test]
    fn missing_file_is_resource_not_found() {
        let err = load_resource(Path::new("web/definitely-not-here.html")).unwrap_err();
        assert!(matches!(err, HttpError::ResourceNotFound(_)));
    }

    #[test]
    fn unchanged_file_is_not_modified() {
        let mtime = SystemTime::now();
        let later = date::format_http_date(mtime + Duration::from_secs(3600));
        assert!(not_modified(Some(mtime), &later));
    }

    #[test]
    fn changed_file_is_modified() {
        let mtime = SystemTime::now();
        let earlier = date::format_http_date(mtime - Duration::from_secs(3600));
        assert!(!not_modified(Some(mtime), &earlier));
    }

    #[test]
    fn bad_header_value_disables_check() {
        assert!(!not_modified(Some(SystemTime::now()), "not a date"));
        assert!(!not_modified(None, "Tue, 25 Aug 2026 10:00:00 GMT"));
    }
}
