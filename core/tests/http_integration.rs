/*
 * http_integration.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * End-to-end tests for the HTTP server and client over real sockets.
 * Each test binds an ephemeral port, serves a scratch directory, and
 * drives the server with the library client or a raw TCP peer.
 *
 * Run with:
 *   cargo test -p fattorino_core --test http_integration -- --nocapture
 */

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use fattorino_core::http::{date, HttpClient, Method};
use fattorino_core::server::{HttpServer, ServerConfig};

/// Fresh scratch directory unique to one test.
fn scratch_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fattorino-{}-{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch root");
    dir
}

async fn start_server(root: PathBuf) -> SocketAddr {
    start_server_with(root, Duration::from_secs(10)).await
}

async fn start_server_with(root: PathBuf, idle_timeout: Duration) -> SocketAddr {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        root,
        idle_timeout,
        ..ServerConfig::default()
    };
    let server = HttpServer::bind(config).await.expect("bind");
    let addr = server.local_addr().expect("local addr");
    tokio::spawn(server.run());
    addr
}

/// Write raw bytes, close our sending side, and collect everything the
/// server sends back until it closes.
async fn raw_exchange(addr: SocketAddr, input: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(input).await.expect("write");
    stream.shutdown().await.expect("shutdown");
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.expect("read");
    out
}

#[tokio::test]
async fn get_serves_file_with_exact_length() {
    let root = scratch_root("get");
    fs::write(root.join("index.html"), b"0123456789").expect("write file");
    let addr = start_server(root).await;

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn.request(Method::Get, "/index.html");
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(200));
    assert_eq!(response.headers.get("Content-Length"), Some("10"));
    assert_eq!(&response.body[..], b"0123456789");
    assert_eq!(response.headers.get("Connection"), Some("keep-alive"));
    assert!(response.headers.get("Date").is_some());
    assert!(response.headers.get("Server").is_some());
}

#[tokio::test]
async fn root_target_serves_default_document() {
    let root = scratch_root("root-doc");
    fs::write(root.join("index.html"), b"home").expect("write file");
    let addr = start_server(root).await;

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn.request(Method::Get, "/");
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(200));
    assert_eq!(&response.body[..], b"home");
}

#[tokio::test]
async fn extensionless_target_maps_to_html() {
    let root = scratch_root("extless");
    fs::write(root.join("about.html"), b"about us").expect("write file");
    let addr = start_server(root).await;

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn.request(Method::Get, "/about");
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(200));
    assert_eq!(&response.body[..], b"about us");
}

#[tokio::test]
async fn missing_resource_gets_canned_404() {
    let root = scratch_root("missing");
    let addr = start_server(root).await;

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn.request(Method::Get, "/no-such-page.html");
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(404));
    let body = String::from_utf8(response.body.to_vec()).expect("utf8 body");
    assert!(body.contains("404"), "body {:?}", body);
    let declared: usize = response
        .headers
        .get("Content-Length")
        .expect("length header")
        .parse()
        .expect("numeric length");
    assert_eq!(declared, response.body.len());
}

#[tokio::test]
async fn unchanged_resource_yields_304_without_body() {
    let root = scratch_root("ims-304");
    fs::write(root.join("index.html"), b"cached content").expect("write file");
    let addr = start_server(root).await;

    let later = date::format_http_date(SystemTime::now() + Duration::from_secs(3600));
    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn
        .request(Method::Get, "/index.html")
        .header("If-Modified-Since", &later);
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(304));
    assert!(response.body.is_empty());
    assert_eq!(response.headers.get("Content-Length"), Some("0"));
}

#[tokio::test]
async fn stale_copy_is_refreshed() {
    let root = scratch_root("ims-200");
    fs::write(root.join("index.html"), b"fresh content").expect("write file");
    let addr = start_server(root).await;

    let earlier = date::format_http_date(SystemTime::now() - Duration::from_secs(3600));
    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn
        .request(Method::Get, "/index.html")
        .header("If-Modified-Since", &earlier);
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(200));
    assert_eq!(&response.body[..], b"fresh content");
}

#[tokio::test]
async fn head_returns_headers_without_body() {
    let root = scratch_root("head");
    fs::write(root.join("index.html"), b"0123456789").expect("write file");
    let addr = start_server(root).await;

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn.request(Method::Head, "/index.html");
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(200));
    assert_eq!(response.headers.get("Content-Length"), Some("10"));
    assert!(response.body.is_empty());

    // The connection stays in sync for a follow-up request.
    let request = conn.request(Method::Get, "/index.html");
    let response = conn.send(request).await.expect("second send");
    assert_eq!(response.status_code(), Some(200));
    assert_eq!(&response.body[..], b"0123456789");
}

#[tokio::test]
async fn post_appends_to_existing_resource() {
    let root = scratch_root("post-append");
    fs::write(root.join("log.txt"), b"start\n").expect("write file");
    let addr = start_server(root.clone()).await;

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn.request(Method::Post, "/log.txt").body_slice(b"hello");
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(200));

    let stored = fs::read(root.join("log.txt")).expect("read back");
    assert_eq!(&stored[..], b"start\nhello");
}

#[tokio::test]
async fn post_creates_missing_resource() {
    let root = scratch_root("post-create");
    let addr = start_server(root.clone()).await;

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn.request(Method::Post, "/fresh.txt").body_slice(b"data");
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(200));
    assert_eq!(
        &fs::read(root.join("fresh.txt")).expect("read back")[..],
        b"data"
    );
}

#[tokio::test]
async fn put_stores_timestamped_file() {
    let root = scratch_root("put");
    let addr = start_server(root.clone()).await;

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn.request(Method::Put, "/").body_slice(b"uploaded");
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(200));

    let stored: Vec<PathBuf> = fs::read_dir(&root)
        .expect("read dir")
        .map(|entry| entry.expect("entry").path())
        .filter(|p| p.extension().map(|e| e == "txt").unwrap_or(false))
        .collect();
    assert_eq!(stored.len(), 1, "entries {:?}", stored);
    assert_eq!(&fs::read(&stored[0]).expect("read back")[..], b"uploaded");
}

#[tokio::test]
async fn keep_alive_serves_sequential_requests() {
    let root = scratch_root("keep-alive");
    fs::write(root.join("index.html"), b"same").expect("write file");
    let addr = start_server(root).await;

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    for _ in 0..3 {
        let request = conn.request(Method::Get, "/index.html");
        let response = conn.send(request).await.expect("send");
        assert_eq!(response.status_code(), Some(200));
        assert_eq!(&response.body[..], b"same");
    }
}

#[tokio::test]
async fn pipelined_heads_get_one_response_each() {
    let root = scratch_root("pipeline");
    fs::write(root.join("index.html"), b"x").expect("write file");
    let addr = start_server(root).await;

    let input = b"GET / HTTP/1.1\r\nHost: h\r\n\r\nGET / HTTP/1.1\r\nHost: h\r\n\r\n";
    let out = raw_exchange(addr, input).await;
    let text = String::from_utf8_lossy(&out);
    assert_eq!(text.matches("HTTP/1.1 200 OK").count(), 2, "out {:?}", text);
}

#[tokio::test]
async fn missing_host_header_is_rejected() {
    let root = scratch_root("no-host");
    let addr = start_server(root).await;

    let out = raw_exchange(addr, b"GET / HTTP/1.1\r\n\r\n").await;
    assert!(
        out.starts_with(b"HTTP/1.1 400"),
        "out {:?}",
        String::from_utf8_lossy(&out)
    );
}

#[tokio::test]
async fn client_decodes_chunked_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut seen = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
            if seen.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n",
            )
            .await
            .expect("write");
    });

    let mut conn = HttpClient::connect("127.0.0.1", addr.port())
        .await
        .expect("connect");
    let request = conn.request(Method::Get, "/");
    let response = conn.send(request).await.expect("send");
    assert_eq!(response.status_code(), Some(200));
    assert_eq!(&response.body[..], b"Wikipedia");
}

#[tokio::test]
async fn idle_connection_is_timed_out() {
    let root = scratch_root("timeout");
    let addr = start_server_with(root, Duration::from_millis(200)).await;

    let mut stream = TcpStream::connect(addr).await.expect("connect");
    // Say nothing; the server should give up and close.
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.expect("read");
    if !out.is_empty() {
        assert!(
            out.starts_with(b"HTTP/1.1 500"),
            "out {:?}",
            String::from_utf8_lossy(&out)
        );
    }
}
