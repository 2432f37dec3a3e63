/*
 * client.rs
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

//! HTTP client over a plain TCP connection.

use std::io;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::http::chunked;
use crate::http::error::HttpError;
use crate::http::framing::Framing;
use crate::http::message::Message;
use crate::http::reader::MessageReader;
use crate::http::request::{Method, RequestBuilder};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Entry point for client connections.
pub struct HttpClient;

impl HttpClient {
    /// Open a TCP connection to the host. DNS resolution and connect
    /// share one fixed deadline.
    pub async fn connect(host: &str, port: u16) -> io::Result<HttpConnection> {
        let addr = format!("{}:{}", host, port);
        let tcp = timeout(CONNECT_TIMEOUT, TcpStream::connect(&addr))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "TCP connect timed out"))??;
        let (read_half, write_half) = tcp.into_split();
        Ok(HttpConnection {
            reader: MessageReader::new(read_half),
            writer: write_half,
            host: host.to_string(),
            port,
        })
    }
}

/// One client connection. Requests are sent strictly one at a time; the
/// reader's residual buffer carries over between responses, so keep-alive
/// reuse is safe.
pub struct HttpConnection {
    reader: MessageReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    host: String,
    port: u16,
}

impl HttpConnection {
    /// Start building a request for this connection.
    pub fn request(&self, method: Method, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, path)
    }

    /// Send the request and block until the complete response, body
    /// included, has been read.
    pub async fn send(&mut self, request: RequestBuilder) -> Result<Message, HttpError> {
        let head_request = matches!(request.method, Method::Head);
        self.write_request(&request).await?;
        read_response(&mut self.reader, head_request).await
    }

    async fn write_request(&mut self, request: &RequestBuilder) -> Result<(), HttpError> {
        let head = request_head(request, &self.host, self.port);
        self.writer.write_all(head.as_bytes()).await?;
        if let Some(body) = &request.body {
            if wants_chunked(request) {
                let mut wire = BytesMut::with_capacity(body.len() + 16);
                chunked::encode_chunked(body, &mut wire);
                self.writer.write_all(&wire).await?;
            } else {
                self.writer.write_all(body).await?;
            }
        }
        self.writer.flush().await?;
        Ok(())
    }
}

fn wants_chunked(request: &RequestBuilder) -> bool {
    request
        .headers
        .get("Transfer-Encoding")
        .map(|v| v.trim() == "chunked")
        .unwrap_or(false)
}

/// Serialize the request head. Host, Content-Length for a non-chunked
/// body, and Connection: keep-alive are filled in unless the caller set
/// them explicitly. A default port of 80 is elided from Host.
fn request_head(request: &RequestBuilder, host: &str, port: u16) -> String {
    let mut head = String::with_capacity(128);
    head.push_str(&format!(
        "{} {} HTTP/1.1\r\n",
        request.method.as_str(),
        request.path
    ));
    if !request.headers.contains("Host") {
        if port == 80 {
            head.push_str(&format!("Host: {}\r\n", host));
        } else {
            head.push_str(&format!("Host: {}:{}\r\n", host, port));
        }
    }
    for (name, value) in request.headers.iter() {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    if let Some(body) = &request.body {
        if !wants_chunked(request) && !request.headers.contains("Content-Length") {
            head.push_str(&format!("Content-Length: {}\r\n", body.len()));
        }
    }
    if !request.headers.contains("Connection") {
        head.push_str("Connection: keep-alive\r\n");
    }
    head.push_str("\r\n");
    head
}

/// Read one complete response. The body is skipped for HEAD responses
/// and for 204 and 304 statuses, whatever the framing headers claim.
pub(crate) async fn read_response<S: AsyncRead + Unpin>(
    reader: &mut MessageReader<S>,
    head_request: bool,
) -> Result<Message, HttpError> {
    let head = match reader.read_until_blank_line().await? {
        Some(block) => block,
        None => return Err(HttpError::ConnectionClosed),
    };
    let mut response = Message::parse_head(&head)?;
    let code = response.status_code().unwrap_or(0);
    if head_request || code == 204 || code == 304 {
        return Ok(response);
    }
    let framing = Framing::from_headers(&response.headers)?;
    response.body = framing.read_body(reader).await?;
    Ok(response)
}
