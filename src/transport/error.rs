//! Error taxonomy for the transport layer.

use thiserror::Error;

/// Errors produced by the outbound transports.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Invalid or incompatible transport setup at construction time, such
    /// as an unreadable root CA bundle. Fatal to startup; never retried.
    #[error("transport configuration error: {0}")]
    Configuration(String),

    /// A Unix-socket target whose authority has no `:port` placeholder to
    /// split off. A malformed target is a programmer/configuration error,
    /// not a transient network failure, so it must not be retried.
    #[error("invalid unix socket address {address:?}: expected <path>:<placeholder>")]
    InvalidAddress {
        /// The authority that failed to split.
        address: String,
    },

    /// Dial or round-trip failure from the underlying client, propagated
    /// unchanged. No retry, no fallback between protocols.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}
