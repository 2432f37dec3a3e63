/*
 * main.rs
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

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use fattorino_core::http::{HttpClient, Method};
use fattorino_core::server::{HttpServer, ServerConfig};

#[derive(Parser)]
#[command(name = "fattorino", version, about = "Minimal HTTP/1.1 client and server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve files from a directory over HTTP.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Directory to serve.
        #[arg(long, default_value = "web")]
        root: PathBuf,
        /// Document served for "/".
        #[arg(long, default_value = "index.html")]
        index: String,
        /// Seconds a connection may sit idle between reads.
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
    /// Send one request and print the response.
    Request {
        /// GET, HEAD, POST, or PUT.
        method: String,
        /// Host to connect to.
        host: String,
        /// Port to connect to.
        #[arg(default_value_t = 8000)]
        port: u16,
        /// Request target.
        #[arg(default_value = "/")]
        path: String,
        /// Body text for POST or PUT.
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        /// File whose contents form the body for POST or PUT.
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Serve {
            host,
            port,
            root,
            index,
            timeout,
        } => serve(host, port, root, index, timeout).await,
        Command::Request {
            method,
            host,
            port,
            path,
            body,
            body_file,
        } => request(method, host, port, path, body, body_file).await,
    }
}

async fn serve(host: String, port: u16, root: PathBuf, index: String, timeout: u64) -> ExitCode {
    let config = ServerConfig {
        host,
        port,
        root,
        default_doc: index,
        idle_timeout: Duration::from_secs(timeout),
    };
    let server = match HttpServer::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("[cli] bind failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = server.run().await {
        eprintln!("[cli] server stopped: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn request(
    method: String,
    host: String,
    port: u16,
    path: String,
    body: Option<String>,
    body_file: Option<PathBuf>,
) -> ExitCode {
    let method = match method.to_uppercase().as_str() {
        "GET" => Method::Get,
        "HEAD" => Method::Head,
        "POST" => Method::Post,
        "PUT" => Method::Put,
        other => {
            eprintln!("[cli] unsupported method {}", other);
            return ExitCode::FAILURE;
        }
    };
    let payload = match (body, body_file) {
        (Some(text), _) => Some(text.into_bytes()),
        (None, Some(file)) => match std::fs::read(&file) {
            Ok(data) => Some(data),
            Err(e) => {
                eprintln!("[cli] cannot read {}: {}", file.display(), e);
                return ExitCode::FAILURE;
            }
        },
        (None, None) => None,
    };
    if payload.is_some() && !matches!(method, Method::Post | Method::Put) {
        eprintln!("[cli] only POST and PUT take a body");
        return ExitCode::FAILURE;
    }
    let path = if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    };

    let mut connection = match HttpClient::connect(&host, port).await {
        Ok(connection) => connection,
        Err(e) => {
            eprintln!("[cli] connect failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut builder = connection.request(method, path);
    if let Some(data) = payload {
        builder = builder.body(data);
    }
    match connection.send(builder).await {
        Ok(response) => {
            println!("{}", response.start_line);
            for (name, value) in response.headers.iter() {
                println!("{}: {}", name, value);
            }
            println!();
            if !response.body.is_empty() {
                let mut stdout = std::io::stdout();
                let _ = stdout.write_all(&response.body);
                let _ = stdout.flush();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[cli] request failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
