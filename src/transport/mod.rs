//! Outbound transport subsystem.
//!
//! # Data Flow
//! ```text
//! Request (resolved target URI from the routing layer)
//!     → dispatcher.rs (Connection: Upgrade token check)
//!         → HTTP/1.1-only client              (upgrade requests)
//!         → registry.rs (scheme → adapter)    (everything else)
//!             → h2c.rs   (h2c://)
//!             → unix.rs  (unix+http://, unix+h2c://)
//!             → TLS/ALPN client               (http://, https://)
//! ```
//!
//! # Design Decisions
//! - Upgrade-bearing requests never travel over HTTP/2; the protocol has no
//!   equivalent of the HTTP/1.1 upgrade handshake.
//! - Each adapter owns its hyper client and therefore its connection pool;
//!   protocol families never share pools.
//! - Scheme dispatch is an explicit table consulted once per request, before
//!   any dial.
//! - Errors bubble up as the result of the dispatch call; nothing is
//!   swallowed, retried, or downgraded to a different protocol.

pub mod builder;
pub mod dispatcher;
pub mod error;
pub mod h2c;
pub mod registry;
pub mod tls;
pub mod unix;

pub use dispatcher::{Http2Transport, SmartDispatcher};
pub use error::TransportError;
pub use registry::{SchemeAdapter, SchemeRegistry};
