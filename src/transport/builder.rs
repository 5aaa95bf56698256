//! Client construction and the HTTP/2 upgrade step.
//!
//! # Responsibilities
//! - Build the HTTP/1.1-only client from `TransportConfig`
//! - Build the TLS/ALPN HTTP/2-capable client
//! - Apply the forwarding timeouts uniformly to every HTTP/2-capable builder

use axum::body::Body;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::{Builder, Client};
use hyper_util::rt::{TokioExecutor, TokioTimer};

use crate::config::schema::{ForwardingTimeouts, TransportConfig};
use crate::transport::error::TransportError;
use crate::transport::tls::{self, HttpsConnector};

/// Client for TCP backends, TLS-capable.
///
/// Both the HTTP/1.1-only and the HTTP/2-capable transport use this type;
/// they differ only in the protocols their connector offers during ALPN.
pub type TcpClient = Client<HttpsConnector, Body>;

/// Client for plain-TCP backends that never perform a TLS handshake (h2c).
pub(crate) type PlainTcpClient = Client<HttpConnector, Body>;

/// TCP connector carrying the shared dial settings.
pub(crate) fn http_connector(config: &TransportConfig) -> HttpConnector {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(config.dial_timeout()));
    connector.set_keepalive(Some(config.keep_alive()));
    connector.set_nodelay(true);
    connector
}

/// Client builder carrying the shared pool settings.
pub(crate) fn base_builder(config: &TransportConfig) -> Builder {
    let mut builder = Client::builder(TokioExecutor::new());
    builder
        .timer(TokioTimer::new())
        .pool_timer(TokioTimer::new())
        .pool_max_idle_per_host(config.max_idle_conns_per_host)
        .pool_idle_timeout(config.idle_conn_timeout());
    builder
}

/// Build the HTTP/1.1-only client used for upgrade-bearing requests.
///
/// TLS targets are still reachable; the connector simply never offers `h2`
/// during the handshake, so the connection stays HTTP/1.1 and can carry the
/// upgrade.
pub(crate) fn build_http1(config: &TransportConfig) -> Result<TcpClient, TransportError> {
    let connector = tls::http1_connector(config)?;
    Ok(base_builder(config).build(connector))
}

/// Enable TLS-negotiated HTTP/2 on the base settings.
///
/// ALPN offers `h2` and `http/1.1`, so backends that do not speak HTTP/2
/// fall back to HTTP/1.1 on the same client.
pub(crate) fn build_http2(config: &TransportConfig) -> Result<TcpClient, TransportError> {
    let connector = tls::alpn_connector(config)?;
    let mut builder = base_builder(config);
    apply_forwarding_timeouts(&mut builder, config.forwarding_timeouts.as_ref());
    Ok(builder.build(connector))
}

/// Apply the HTTP/2 liveness-probe timeouts to a client builder.
///
/// The read-idle timeout becomes the keep-alive PING interval and the ping
/// timeout bounds the wait for the PING acknowledgement. Shared by the TLS
/// HTTP/2 client and both h2c clients.
pub(crate) fn apply_forwarding_timeouts(
    builder: &mut Builder,
    timeouts: Option<&ForwardingTimeouts>,
) {
    if let Some(timeouts) = timeouts {
        builder
            .http2_keep_alive_interval(timeouts.read_idle_timeout())
            .http2_keep_alive_timeout(timeouts.ping_timeout())
            .http2_keep_alive_while_idle(true);
    }
}
