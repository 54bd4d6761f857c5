//! CMS Bypass
//!
//! Decides whether a request belongs to the CMS and must skip session
//! handling entirely.

use axum::http::Method;

use crate::domain::value_object::route_policy::RoutePolicy;

/// Methods advertised to cross-origin CMS tooling
pub const CMS_ALLOWED_METHODS: &str = "GET, OPTIONS, POST, DELETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassDecision {
    /// CORS preflight for a CMS path: answer 204 immediately
    Preflight,
    /// CMS path: run the route, add CORS headers, skip the session
    PassThrough,
    /// Not a CMS path: hand over to the session refresher
    Delegate,
}

pub fn classify(routes: &RoutePolicy, method: &Method, path: &str) -> BypassDecision {
    if !routes.is_reserved_cms(path) {
        return BypassDecision::Delegate;
    }

    if method == Method::OPTIONS {
        BypassDecision::Preflight
    } else {
        BypassDecision::PassThrough
    }
}
