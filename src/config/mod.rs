//! Transport configuration subsystem.
//!
//! # Data Flow
//! ```text
//! proxy config file (deserialized by the proxy's config layer)
//!     → schema.rs (serde types, defaults, Duration accessors)
//!     → TransportConfig (immutable)
//!     → shared read-only by every transport built from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once built; a changed config means building a new
//!   dispatcher (see `SmartDispatcher::clone_detached`).
//! - Every field has a default so minimal configs deserialize.
//! - Durations are stored as `*_secs` integers and exposed as `Duration`.

pub mod schema;

pub use schema::{ClientTlsConfig, ForwardingTimeouts, TransportConfig};
