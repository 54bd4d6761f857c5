use std::fmt;

/// How the session gateway treats a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Owned by the CMS; never touches the session
    ReservedCms,
    /// Requires a signed-in user
    Protected,
    /// Public landing page; signed-in users are sent to their account
    Landing,
    Public,
}

impl RouteClass {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use RouteClass::*;
        match self {
            ReservedCms => "reserved_cms",
            Protected => "protected",
            Landing => "landing",
            Public => "public",
        }
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Path layout the gateway enforces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Matched on `/` boundaries: `/keystatic` covers `/keystatic/x` but not `/keystaticx`.
    pub cms_prefixes: Vec<String>,
    /// Plain string prefix: `/account` covers `/account`, `/account/children`, `/accounts`.
    pub protected_prefix: String,
    pub landing_path: String,
    pub sign_in_path: String,
    pub account_path: String,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            cms_prefixes: vec!["/keystatic".to_string(), "/api/keystatic".to_string()],
            protected_prefix: "/account".to_string(),
            landing_path: "/".to_string(),
            sign_in_path: "/sign-in".to_string(),
            account_path: "/account".to_string(),
        }
    }
}

impl RoutePolicy {
    pub fn with_cms_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cms_prefixes = prefixes
            .into_iter()
            .map(Into::into)
            .map(|p| normalize_prefix(&p))
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Classify a request path. Query strings must already be stripped.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.is_reserved_cms(path) {
            RouteClass::ReservedCms
        } else if path.starts_with(self.protected_prefix.as_str()) {
            RouteClass::Protected
        } else if path == self.landing_path {
            RouteClass::Landing
        } else {
            RouteClass::Public
        }
    }

    pub fn is_reserved_cms(&self, path: &str) -> bool {
        self.cms_prefixes
            .iter()
            .any(|prefix| path_under(path, prefix))
    }
}

/// `path` equals `prefix` or is a `/`-separated descendant of it
fn path_under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Leading slash, no trailing slash; `/` alone is rejected as a prefix.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
