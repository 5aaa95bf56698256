//! Per-request transport selection.
//!
//! # Responsibilities
//! - Detect `Connection: Upgrade` requests and pin them to HTTP/1.1
//! - Route everything else through the HTTP/2-capable composite transport
//! - Fan out to scheme adapters (h2c, unix+http, unix+h2c) via the registry
//! - Produce independent dispatcher copies for per-backend reuse

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, Response};
use hyper::body::Incoming;

use crate::config::schema::TransportConfig;
use crate::transport::builder::{self, TcpClient};
use crate::transport::error::TransportError;
use crate::transport::h2c::H2cTransport;
use crate::transport::registry::SchemeRegistry;
use crate::transport::unix::{UnixH2cTransport, UnixHttpTransport};

/// HTTP/2-capable composite: the TLS/ALPN client plus the scheme table.
#[derive(Debug)]
pub struct Http2Transport {
    client: TcpClient,
    registry: SchemeRegistry,
}

impl Http2Transport {
    /// Build the composite and register the stock adapters.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = builder::build_http2(config)?;
        let mut registry = SchemeRegistry::new();
        registry.register("h2c", Arc::new(H2cTransport::new(config)));
        registry.register("unix+http", Arc::new(UnixHttpTransport::new(config)));
        registry.register("unix+h2c", Arc::new(UnixH2cTransport::new(config)));
        Ok(Self { client, registry })
    }

    /// Dispatch through the matching scheme adapter, or through the
    /// TLS/ALPN client when no adapter claims the scheme.
    pub async fn dispatch(
        &self,
        req: Request<Body>,
    ) -> Result<Response<Incoming>, TransportError> {
        let adapter = req
            .uri()
            .scheme_str()
            .and_then(|scheme| self.registry.adapter_for(scheme));
        if let Some(adapter) = adapter {
            tracing::debug!(uri = %req.uri(), "dispatching via scheme adapter");
            return adapter.dispatch(req).await;
        }
        Ok(self.client.request(req).await?)
    }
}

/// Per-request transport selector.
///
/// Holds exactly two transport handles: a strictly HTTP/1.1 client for
/// upgrade-bearing requests and the HTTP/2-capable composite for everything
/// else. The dispatcher keeps no per-request state, so it is safe to share
/// across tasks without locking.
pub struct SmartDispatcher {
    http1: TcpClient,
    http2: Http2Transport,
    config: TransportConfig,
}

impl SmartDispatcher {
    /// Construct every transport from the shared configuration.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let http1 = builder::build_http1(&config)?;
        let http2 = Http2Transport::new(&config)?;
        Ok(Self {
            http1,
            http2,
            config,
        })
    }

    /// Forward one request over the transport its semantics require.
    ///
    /// Requests whose `Connection` header carries the `Upgrade` token never
    /// travel over HTTP/2: the protocol has no frame-level equivalent of the
    /// HTTP/1.1 upgrade handshake, so WebSocket and similar tunnels would
    /// silently break.
    pub async fn dispatch(
        &self,
        req: Request<Body>,
    ) -> Result<Response<Incoming>, TransportError> {
        if connection_wants_upgrade(req.headers()) {
            tracing::debug!(uri = %req.uri(), "upgrade request, pinning to http/1.1");
            return Ok(self.http1.request(req).await?);
        }
        self.http2.dispatch(req).await
    }

    /// Build an independent dispatcher from the same configuration.
    ///
    /// The copy shares no connection-pool state with the original; each
    /// dispatcher's own transports keep pooling internally as usual.
    pub fn clone_detached(&self) -> Result<Self, TransportError> {
        Self::new(self.config.clone())
    }

    /// The configuration this dispatcher was built from.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl std::fmt::Debug for SmartDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartDispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Token match for `Upgrade` in the `Connection` header.
///
/// `Connection` is a comma-separated token list and may appear multiple
/// times. Matching is case-insensitive and never a substring match, so
/// `Upgrade` among other tokens counts while values such as
/// `upgrade-insecure-requests` do not.
fn connection_wants_upgrade(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"))
}
