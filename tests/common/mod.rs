//! Shared mock backends for the transport integration tests.
//!
//! Each backend reports the HTTP version it saw (`x-seen-version`) and
//! echoes the request's `Connection` header (`x-seen-connection`) so tests
//! can assert which wire protocol a request actually travelled over.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{HeaderMap, Request, Response, Version};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use hyper::body::Incoming;
use hyper::server::conn::{http1, http2};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use tokio::net::{TcpListener, UnixListener};

fn echo_response(version: Version, headers: &HeaderMap) -> Response<Body> {
    let connection = headers
        .get("connection")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    Response::builder()
        .header("x-seen-version", format!("{version:?}"))
        .header("x-seen-connection", connection)
        .body(Body::from("hello from mock backend"))
        .unwrap()
}

async fn echo(req: Request<Incoming>) -> Result<Response<Body>, Infallible> {
    Ok(echo_response(req.version(), req.headers()))
}

async fn echo_handler(req: Request<Body>) -> Response<Body> {
    echo_response(req.version(), req.headers())
}

/// Serve HTTP/1.1 on an ephemeral TCP port; returns the bound address.
pub async fn spawn_http1_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(echo))
                    .await;
            });
        }
    });
    addr
}

/// Serve prior-knowledge HTTP/2 (no TLS) on an ephemeral TCP port.
pub async fn spawn_h2c_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _ = http2::Builder::new(TokioExecutor::new())
                    .serve_connection(TokioIo::new(stream), service_fn(echo))
                    .await;
            });
        }
    });
    addr
}

/// Serve TLS with ALPN `h2`/`http/1.1` on an ephemeral TCP port, so the
/// negotiated protocol follows whatever the client's handshake offers.
pub async fn spawn_tls_backend() -> SocketAddr {
    let config = RustlsConfig::from_pem(
        include_bytes!("../testdata/cert.pem").to_vec(),
        include_bytes!("../testdata/key.pem").to_vec(),
    )
    .await
    .unwrap();

    let app = Router::new().fallback(echo_handler);
    let handle = axum_server::Handle::new();
    let server_handle = handle.clone();
    tokio::spawn(async move {
        let _ = axum_server::bind_rustls("127.0.0.1:0".parse().unwrap(), config)
            .handle(server_handle)
            .serve(app.into_make_service())
            .await;
    });
    handle.listening().await.unwrap()
}

/// Serve HTTP/1.1 on a Unix socket.
pub fn spawn_unix_http1_backend(path: &Path) {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(echo))
                    .await;
            });
        }
    });
}

/// Serve prior-knowledge HTTP/2 on a Unix socket.
pub fn spawn_unix_h2c_backend(path: &Path) {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _ = http2::Builder::new(TokioExecutor::new())
                    .serve_connection(TokioIo::new(stream), service_fn(echo))
                    .await;
            });
        }
    });
}

/// Fresh socket path under the temp dir; removes any stale socket file.
pub fn unix_socket_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("{name}-{}.sock", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

/// Hex-encode a socket path for use in a URI host component. The single
/// encoding authority for every test that builds a `unix+` target.
pub fn encode_socket_path(path: &Path) -> String {
    hex::encode(path.to_string_lossy().as_bytes())
}

/// Read a response body into a string.
pub async fn body_string(body: Incoming) -> String {
    let bytes = axum::body::to_bytes(Body::new(body), 64 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
