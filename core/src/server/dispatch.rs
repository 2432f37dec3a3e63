/*
 * dispatch.rs
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

//! Per-connection request loop: read a head, frame and read the body,
//! dispatch on the method, respond, repeat until the peer goes away.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::error::HttpError;
use crate::http::framing::Framing;
use crate::http::message::Message;
use crate::http::reader::MessageReader;
use crate::http::response;
use crate::server::resource;
use crate::server::ServerConfig;

/// Whether the connection stays open after a response.
enum Flow {
    Continue,
    Close,
}

pub(crate) async fn serve_connection(stream: TcpStream, config: Arc<ServerConfig>) {
    let peer = match stream.peer_addr() {
        Ok(addr) => addr.to_string(),
        Err(_) => "unknown".to_string(),
    };
    let (read_half, write_half) = stream.into_split();
    run_loop(read_half, write_half, &config, &peer).await;
}

async fn run_loop<R, W>(read_half: R, mut writer: W, config: &ServerConfig, peer: &str)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = MessageReader::with_timeout(read_half, config.idle_timeout);
    loop {
        // Clean end of stream between requests ends the conversation;
        // anything else mid-head is an error on the peer's part.
        let head = match reader.read_until_blank_line().await {
            Ok(Some(head)) => head,
            Ok(None) => break,
            Err(e) => {
                fail(&mut writer, &e, peer).await;
                break;
            }
        };
        match handle_request(&head, &mut reader, &mut writer, config).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Close) => break,
            Err(e) => {
                fail(&mut writer, &e, peer).await;
                break;
            }
        }
    }
    eprintln!("[server] {} disconnected", peer);
}

/// Map an error onto a best-effort response before closing. The peer
/// may already be gone, so write failures are ignored.
async fn fail<W: AsyncWrite + Unpin>(writer: &mut W, error: &HttpError, peer: &str) {
    eprintln!("[server] {} failed: {}", peer, error);
    let status = error.status_code();
    let detail = if status == 500 {
        Some(error.to_string())
    } else {
        None
    };
    let body = response::canned_body(status, detail.as_deref());
    let _ = send_response(writer, status, &body, true).await;
}

async fn handle_request<R, W>(
    head: &[u8],
    reader: &mut MessageReader<R>,
    writer: &mut W,
    config: &ServerConfig,
) -> Result<Flow, HttpError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let request = Message::parse_head(head)?;
    let method = request.method().unwrap_or("").to_string();
    let target = request.target().unwrap_or("/").to_string();
    eprintln!("[server] {} {}", method, target);

    if !request.headers.contains("Host") {
        send_response(writer, 400, &response::canned_body(400, None), true).await?;
        return Ok(Flow::Close);
    }

    // Only POST and PUT carry a request body, always fixed-length.
    let body = match method.as_str() {
        "POST" | "PUT" => match Framing::from_headers(&request.headers)? {
            Framing::Chunked => {
                return Err(HttpError::Unsupported("chunked request body".to_string()));
            }
            framing => framing.read_body(reader).await?,
        },
        _ => Bytes::new(),
    };

    match method.as_str() {
        "GET" | "HEAD" => {
            let include_body = method == "GET";
            let path = resource::resolve_target(&config.root, &target, &config.default_doc);
            match resource::load_resource(&path) {
                Ok((data, modified)) => {
                    let unchanged = request
                        .headers
                        .get("If-Modified-Since")
                        .map(|since| resource::not_modified(modified, since))
                        .unwrap_or(false);
                    if unchanged {
                        send_response(writer, 304, b"", false).await?;
                    } else {
                        send_response(writer, 200, &data, include_body).await?;
                    }
                    Ok(Flow::Continue)
                }
                Err(HttpError::ResourceNotFound(_)) => {
                    let body = response::canned_body(404, None);
                    send_response(writer, 404, &body, include_body).await?;
                    Ok(Flow::Continue)
                }
                Err(e) => Err(e),
            }
        }
        "POST" => {
            let path = resource::resolve_write_target(&config.root, &target);
            resource::append_resource(&path, &body)?;
            send_response(writer, 200, b"", true).await?;
            Ok(Flow::Continue)
        }
        "PUT" => {
            let path = resource::create_timestamped(&config.root, &body)?;
            eprintln!("[server] stored {}", path.display());
            send_response(writer, 200, b"", true).await?;
            Ok(Flow::Continue)
        }
        other => Err(HttpError::Unsupported(format!("method {}", other))),
    }
}

/// Write a composed head and, when the response carries one, the body.
/// Content-Length always describes the full body even when it is not
/// transmitted, as for HEAD.
async fn send_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    status: u16,
    body: &[u8],
    include_body: bool,
) -> Result<(), HttpError> {
    let head = response::compose_head(status, body.len());
    writer.write_all(head.as_bytes()).await?;
    if include_body && !body.is_empty() {
        writer.write_all(body).await?;
    }
    writer.flush().await?;
    Ok(())
}
