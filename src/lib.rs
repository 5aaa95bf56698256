//! Outbound transport layer for a reverse proxy.
//!
//! Forwards requests to backends over whichever protocol the target expects:
//! HTTP/1.1, TLS-negotiated HTTP/2, cleartext HTTP/2 (h2c), or any of those
//! over a Unix domain socket. The transport is chosen per request from the
//! target URI scheme and the request's `Connection` header, so callers never
//! pre-select a protocol.

pub mod config;
pub mod transport;

pub use config::schema::{ClientTlsConfig, ForwardingTimeouts, TransportConfig};
pub use transport::dispatcher::SmartDispatcher;
pub use transport::error::TransportError;
