//! Cleartext HTTP/2 (h2c) adapter.
//!
//! Backends addressed as `h2c://host:port` are spoken to with HTTP/2 framing
//! over a plain TCP connection. The client is pinned to HTTP/2
//! (prior-knowledge mode, no ALPN) and its connector performs no TLS
//! handshake; the request's scheme is rewritten to `http` on the owned copy
//! before dispatch.

use axum::body::Body;
use axum::http::uri::Scheme;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use hyper::body::Incoming;

use crate::config::schema::TransportConfig;
use crate::transport::builder::{self, PlainTcpClient};
use crate::transport::error::TransportError;
use crate::transport::registry::{self, SchemeAdapter};

/// Adapter forcing cleartext HTTP/2.
#[derive(Debug, Clone)]
pub struct H2cTransport {
    client: PlainTcpClient,
}

impl H2cTransport {
    /// Build the h2c client from the shared settings.
    pub fn new(config: &TransportConfig) -> Self {
        let mut builder = builder::base_builder(config);
        builder.http2_only(true);
        builder::apply_forwarding_timeouts(&mut builder, config.forwarding_timeouts.as_ref());
        Self {
            client: builder.build(builder::http_connector(config)),
        }
    }
}

impl SchemeAdapter for H2cTransport {
    fn dispatch(
        &self,
        req: Request<Body>,
    ) -> BoxFuture<'static, Result<Response<Incoming>, TransportError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let req = registry::with_scheme(req, Scheme::HTTP)?;
            tracing::trace!(uri = %req.uri(), "dispatching cleartext http/2");
            Ok(client.request(req).await?)
        })
    }
}
