//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use anyhow::{Context, anyhow};
use auth::{AuthConfig, AuthFailurePolicy};
use cms::CmsConfig;
use platform::client::UpstreamConfig;
use records::RecordsConfig;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Process-wide configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub bind_addr: SocketAddr,
    pub cookie_secure: bool,
    pub failure_policy: AuthFailurePolicy,
    /// `None` keeps the built-in reserved prefixes
    pub cms_prefixes: Option<Vec<String>>,
    pub cms_content_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("SUPABASE_URL").context("SUPABASE_URL must be set in environment")?;
        let api_key =
            get("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY must be set in environment")?;

        let mut upstream = UpstreamConfig::new(base_url.trim_end_matches('/'), api_key);
        if let Some(secs) = get("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("UPSTREAM_TIMEOUT_SECS is not a number: {}", secs))?;
            upstream.timeout = Duration::from_secs(secs);
        }

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR is not a socket address")?;

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(v) => parse_bool(&v).ok_or_else(|| anyhow!("COOKIE_SECURE must be true or false"))?,
            None => !cfg!(debug_assertions),
        };

        let failure_policy = match get("AUTH_FAILURE_POLICY") {
            Some(v) => v.parse::<AuthFailurePolicy>().map_err(|e| anyhow!(e))?,
            None => AuthFailurePolicy::default(),
        };

        let cms_prefixes = get("CMS_PREFIXES").map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        });

        let cms_content_dir = get("CMS_CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| CmsConfig::default().content_dir);

        Ok(Self {
            upstream,
            bind_addr,
            cookie_secure,
            failure_policy,
            cms_prefixes,
            cms_content_dir,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        let mut config = AuthConfig::for_project(&self.upstream.project_ref());
        config.session_cookie.secure = self.cookie_secure;
        config.failure_policy = self.failure_policy;
        if let Some(prefixes) = &self.cms_prefixes {
            config.routes = config.routes.with_cms_prefixes(prefixes.iter().cloned());
        }
        config
    }

    pub fn records_config(&self) -> RecordsConfig {
        RecordsConfig::default()
    }

    /// The editor API is mounted under the first reserved prefix below `/api/`,
    /// and not at all when no reserved prefix is there.
    pub fn cms_config(&self) -> CmsConfig {
        let mut config = CmsConfig::default().with_content_dir(self.cms_content_dir.clone());
        config.api_prefix = self
            .auth_config()
            .routes
            .cms_prefixes
            .into_iter()
            .find(|p| p.starts_with("/api/"));
        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("SUPABASE_URL", "https://abcd.supabase.co/"),
        ("SUPABASE_ANON_KEY", "anon"),
    ];

    #[test]
    fn test_required_values() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")])).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.upstream.base_url, "https://abcd.supabase.co");
        assert_eq!(config.upstream.timeout, Duration::from_secs(10));
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.failure_policy, AuthFailurePolicy::TreatAsSignedOut);
        assert_eq!(config.cms_content_dir, PathBuf::from("src/content/posts"));

        let auth = config.auth_config();
        assert_eq!(auth.session_cookie_name(), "sb-abcd-auth-token");
        assert_eq!(
            config.cms_config().posts_api_path().as_deref(),
            Some("/api/keystatic/posts")
        );
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("COOKIE_SECURE", "false"),
            ("AUTH_FAILURE_POLICY", "unavailable"),
            ("CMS_PREFIXES", "/outstatic, /api/outstatic"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
        ]);
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.upstream.timeout, Duration::from_secs(3));
        let auth = config.auth_config();
        assert!(!auth.session_cookie.secure);
        assert_eq!(auth.failure_policy, AuthFailurePolicy::ServiceUnavailable);
        assert_eq!(auth.routes.cms_prefixes, vec!["/outstatic", "/api/outstatic"]);
        assert_eq!(
            config.cms_config().posts_api_path().as_deref(),
            Some("/api/outstatic/posts")
        );
    }

    #[test]
    fn test_editor_api_unmounted_without_reserved_api_prefix() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("CMS_PREFIXES", "/keystatic"));
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.auth_config().routes.cms_prefixes, vec!["/keystatic"]);
        assert!(config.cms_config().api_prefix.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AUTH_FAILURE_POLICY", "sometimes"));
        assert!(AppConfig::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("COOKIE_SECURE", "maybe"));
        assert!(AppConfig::from_lookup(lookup(&pairs)).is_err());
    }
}
