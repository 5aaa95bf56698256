//! Configuration schema for the upstream transports.
//!
//! All types derive Serde traits so the proxy's configuration layer can
//! deserialize them straight from its config file. This crate itself never
//! reads config files; the only filesystem access here is loading the
//! optional root CA bundles at construction time.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by every transport built from one dispatcher.
///
/// Supplied once at construction (or on a config reload, which builds a new
/// dispatcher) and read-only afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Timeout for establishing a backend connection, in seconds.
    pub dial_timeout_secs: u64,

    /// TCP keep-alive interval for backend connections, in seconds.
    pub keep_alive_secs: u64,

    /// Maximum idle connections kept per backend host.
    pub max_idle_conns_per_host: usize,

    /// How long an idle pooled connection survives before eviction, in seconds.
    pub idle_conn_timeout_secs: u64,

    /// TLS settings for HTTPS backends. `None` trusts the bundled webpki
    /// roots with full certificate verification.
    pub tls: Option<ClientTlsConfig>,

    /// HTTP/2 liveness-probe timeouts. `None` leaves the HTTP/2 layer's
    /// own defaults in place.
    pub forwarding_timeouts: Option<ForwardingTimeouts>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            dial_timeout_secs: 30,
            keep_alive_secs: 30,
            max_idle_conns_per_host: 200,
            idle_conn_timeout_secs: 90,
            tls: None,
            forwarding_timeouts: None,
        }
    }
}

impl TransportConfig {
    pub fn dial_timeout(&self) -> Duration {
        Duration::from_secs(self.dial_timeout_secs)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn idle_conn_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_conn_timeout_secs)
    }
}

/// Liveness-probe timeouts for HTTP/2 connections.
///
/// Applied through one shared routine to the TLS HTTP/2 client and both h2c
/// clients, so the variants cannot drift apart.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingTimeouts {
    /// How long a connection may go without receiving frames before a
    /// liveness probe (PING) is sent, in seconds.
    pub read_idle_timeout_secs: u64,

    /// How long to wait for a probe response before the connection is
    /// considered dead, in seconds.
    pub ping_timeout_secs: u64,
}

impl Default for ForwardingTimeouts {
    fn default() -> Self {
        Self {
            read_idle_timeout_secs: 30,
            ping_timeout_secs: 15,
        }
    }
}

impl ForwardingTimeouts {
    pub fn read_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.read_idle_timeout_secs)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_secs)
    }
}

/// TLS settings for connections to HTTPS backends.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientTlsConfig {
    /// Skip verification of backend certificates. Testing only.
    pub insecure_skip_verify: bool,

    /// Additional PEM root CA bundles trusted for backend connections,
    /// appended to the bundled webpki roots.
    pub root_ca_paths: Vec<String>,
}
