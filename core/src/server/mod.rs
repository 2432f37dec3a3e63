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

//! File-serving HTTP server: bind, accept, one task per connection.
//!
//! Connections are independent; each runs its own request loop and the
//! only shared state is the filesystem under the configured root.

mod dispatch;
pub mod resource;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

/// Server settings. `Default` gives 127.0.0.1:8000 serving "web" with
/// index.html as the default document and a 10 second idle timeout.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory resources are served from and written to.
    pub root: PathBuf,
    /// Document served for the "/" target.
    pub default_doc: String,
    /// Deadline for each blocking read on a connection.
    pub idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            root: PathBuf::from("web"),
            default_doc: "index.html".to_string(),
            idle_timeout: Duration::from_secs(10),
        }
    }
}

/// A bound listener. Port 0 binds an ephemeral port; `local_addr`
/// reports the one actually chosen.
pub struct HttpServer {
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl HttpServer {
    pub async fn bind(config: ServerConfig) -> io::Result<HttpServer> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr).await?;
        Ok(HttpServer {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Never returns except on listener failure; each
    /// accepted connection gets its own task and cannot take the loop
    /// down with it.
    pub async fn run(self) -> io::Result<()> {
        eprintln!("[server] listening on {}", self.listener.local_addr()?);
        loop {
            let (stream, addr) = self.listener.accept().await?;
            eprintln!("[server] connection from {}", addr);
            let config = Arc::clone(&self.config);
            tokio::spawn(dispatch::serve_connection(stream, config));
        }
    }
}
