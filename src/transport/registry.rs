//! Scheme-based protocol registry.
//!
//! Maps a target-URI scheme (`h2c`, `unix+http`, `unix+h2c`) to the adapter
//! that speaks it. The table is populated once at construction and consulted
//! once per request, before any dial; there is no runtime re-registration
//! and no removal. Registering a scheme twice overwrites the earlier adapter
//! (last write wins).

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::uri::{PathAndQuery, Scheme, Uri};
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use hyper::body::Incoming;

use crate::transport::error::TransportError;

/// A transport bound to one protocol/socket combination.
///
/// Adapters own their client (and thus their connection pool); the registry
/// only hands out shared references.
pub trait SchemeAdapter: Send + Sync {
    /// Forward the request over this adapter's protocol.
    fn dispatch(
        &self,
        req: Request<Body>,
    ) -> BoxFuture<'static, Result<Response<Incoming>, TransportError>>;
}

/// Scheme → adapter table.
#[derive(Clone, Default)]
pub struct SchemeRegistry {
    adapters: HashMap<&'static str, Arc<dyn SchemeAdapter>>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter for a scheme. Last write wins.
    pub fn register(&mut self, scheme: &'static str, adapter: Arc<dyn SchemeAdapter>) {
        self.adapters.insert(scheme, adapter);
    }

    /// The adapter handling the given scheme, if one is registered.
    pub fn adapter_for(&self, scheme: &str) -> Option<&Arc<dyn SchemeAdapter>> {
        self.adapters.get(scheme)
    }
}

impl std::fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut schemes: Vec<_> = self.adapters.keys().collect();
        schemes.sort();
        f.debug_struct("SchemeRegistry")
            .field("schemes", &schemes)
            .finish()
    }
}

/// Rebuild a request with a different URI scheme.
///
/// Operates on the owned request, so a caller keeping its own copy of the
/// original URI never observes the rewrite.
pub(crate) fn with_scheme(
    req: Request<Body>,
    scheme: Scheme,
) -> Result<Request<Body>, TransportError> {
    let (mut parts, body) = req.into_parts();
    let mut uri = parts.uri.into_parts();
    uri.scheme = Some(scheme);
    if uri.path_and_query.is_none() {
        uri.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = Uri::from_parts(uri).map_err(|e| {
        TransportError::Configuration(format!("target URI rejected after scheme rewrite: {e}"))
    })?;
    Ok(Request::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged(&'static str);

    impl SchemeAdapter for Tagged {
        fn dispatch(
            &self,
            _req: Request<Body>,
        ) -> BoxFuture<'static, Result<Response<Incoming>, TransportError>> {
            let tag = self.0;
            Box::pin(async move { Err(TransportError::Configuration(tag.to_string())) })
        }
    }

    #[test]
    fn lookup_by_scheme() {
        let mut registry = SchemeRegistry::new();
        registry.register("h2c", Arc::new(Tagged("h2c")));
        assert!(registry.adapter_for("h2c").is_some());
        assert!(registry.adapter_for("unix+http").is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_overwrites() {
        let mut registry = SchemeRegistry::new();
        registry.register("h2c", Arc::new(Tagged("first")));
        registry.register("h2c", Arc::new(Tagged("second")));

        let req = Request::builder()
            .uri("h2c://backend:8080/")
            .body(Body::empty())
            .unwrap();
        let err = registry
            .adapter_for("h2c")
            .unwrap()
            .dispatch(req)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "transport configuration error: second");
    }

    #[test]
    fn scheme_rewrite_preserves_authority_and_path() {
        let req = Request::builder()
            .uri("h2c://backend:8080/api/v1?q=1")
            .body(Body::empty())
            .unwrap();
        let req = with_scheme(req, Scheme::HTTP).unwrap();
        assert_eq!(req.uri().to_string(), "http://backend:8080/api/v1?q=1");
    }

    #[test]
    fn scheme_rewrite_fills_in_empty_path() {
        let req = Request::builder()
            .uri(Uri::from_static("h2c://backend:8080"))
            .body(Body::empty())
            .unwrap();
        let req = with_scheme(req, Scheme::HTTP).unwrap();
        assert_eq!(req.uri().scheme_str(), Some("http"));
        assert_eq!(req.uri().authority().unwrap().as_str(), "backend:8080");
        assert_eq!(req.uri().path(), "/");
    }
}
