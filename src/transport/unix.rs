//! Unix-domain-socket transports.
//!
//! Backends addressed as `unix+http://<path>:0/...` or
//! `unix+h2c://<path>:0/...` are dialed over a Unix socket instead of TCP.
//! URI authorities cannot carry `/`, so the routing layer hex-encodes the
//! socket path into the host component (`/tmp/app.sock` becomes
//! `2f746d702f6170702e736f636b`) and appends a `:port` placeholder, which
//! is split off and discarded here. A target with no placeholder is
//! rejected as `InvalidAddress` before any dial.

use std::path::PathBuf;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::uri::{Scheme, Uri};
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use hyper::body::Incoming;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tower::Service;

use crate::config::schema::TransportConfig;
use crate::transport::builder;
use crate::transport::error::TransportError;
use crate::transport::registry::{self, SchemeAdapter};

type UnixClient = Client<UnixConnector, Body>;

/// Extract the socket path from a Unix target URI.
///
/// The authority is `<hex-encoded path>:<placeholder>`; the placeholder is
/// required to be present but its value is ignored. Hex digits of either
/// case are accepted.
pub(crate) fn socket_path(uri: &Uri) -> Result<PathBuf, TransportError> {
    let authority = uri
        .authority()
        .map(|a| a.as_str())
        .ok_or_else(|| TransportError::InvalidAddress {
            address: uri.to_string(),
        })?;
    let (encoded, _placeholder) =
        authority
            .rsplit_once(':')
            .ok_or_else(|| TransportError::InvalidAddress {
                address: authority.to_string(),
            })?;
    let bytes = hex::decode(encoded).map_err(|_| TransportError::InvalidAddress {
        address: authority.to_string(),
    })?;
    let path = String::from_utf8(bytes).map_err(|_| TransportError::InvalidAddress {
        address: authority.to_string(),
    })?;
    Ok(PathBuf::from(path))
}

/// Connector that dials the Unix socket named by the target's host
/// component instead of opening a TCP connection.
#[derive(Debug, Clone, Default)]
pub struct UnixConnector;

impl Service<Uri> for UnixConnector {
    type Response = TokioIo<UnixStream>;
    type Error = Box<dyn std::error::Error + Send + Sync>;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        Box::pin(async move {
            let path = socket_path(&uri)?;
            tracing::trace!(path = %path.display(), "dialing unix socket");
            let stream = UnixStream::connect(&path).await?;
            Ok(TokioIo::new(stream))
        })
    }
}

/// HTTP/1.1 over a Unix socket (`unix+http`).
///
/// Pool settings mirror the base transport's; hyper's client exposes no
/// expect/continue timeout, so that knob has no counterpart here.
#[derive(Debug, Clone)]
pub struct UnixHttpTransport {
    client: UnixClient,
}

impl UnixHttpTransport {
    pub fn new(config: &TransportConfig) -> Self {
        Self {
            client: builder::base_builder(config).build(UnixConnector),
        }
    }
}

impl SchemeAdapter for UnixHttpTransport {
    fn dispatch(
        &self,
        req: Request<Body>,
    ) -> BoxFuture<'static, Result<Response<Incoming>, TransportError>> {
        let client = self.client.clone();
        Box::pin(async move {
            // Reject malformed targets before any dial happens.
            socket_path(req.uri())?;
            let req = registry::with_scheme(req, Scheme::HTTP)?;
            Ok(client.request(req).await?)
        })
    }
}

/// Cleartext HTTP/2 over a Unix socket (`unix+h2c`).
#[derive(Debug, Clone)]
pub struct UnixH2cTransport {
    client: UnixClient,
}

impl UnixH2cTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let mut builder = builder::base_builder(config);
        builder.http2_only(true);
        builder::apply_forwarding_timeouts(&mut builder, config.forwarding_timeouts.as_ref());
        Self {
            client: builder.build(UnixConnector),
        }
    }
}

impl SchemeAdapter for UnixH2cTransport {
    fn dispatch(
        &self,
        req: Request<Body>,
    ) -> BoxFuture<'static, Result<Response<Incoming>, TransportError>> {
        let client = self.client.clone();
        Box::pin(async move {
            socket_path(req.uri())?;
            let req = registry::with_scheme(req, Scheme::HTTP)?;
            Ok(client.request(req).await?)
        })
    }
}
