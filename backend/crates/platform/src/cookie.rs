//! Cookie Management Infrastructure
//!
//! Cookie parsing, Set-Cookie building, and chunking of values that exceed
//! what browsers reliably store in a single cookie.

use axum::http::{HeaderMap, HeaderValue, header};

/// Largest value stored in one cookie before it is split into chunks.
pub const MAX_CHUNK_SIZE: usize = 3180;

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie attributes shared by every cookie a component writes
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Base name; chunks are `<name>.0`, `<name>.1`, ...
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Build Set-Cookie header value for the base cookie
    pub fn build_set_cookie(&self, value: &str) -> String {
        self.build_set_cookie_named(&self.name, value)
    }

    /// Build Set-Cookie header value for an arbitrary name (e.g. a chunk)
    pub fn build_set_cookie_named(&self, name: &str, value: &str) -> String {
        let mut cookie = format!("{}={}", name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build Set-Cookie header for deletion (expired)
    pub fn build_delete_cookie_named(&self, name: &str) -> String {
        let mut cookie = format!(
            "{}=; Path={}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            name, self.path
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie
    }

    /// Set-Cookie values that store `value`, chunked when needed, and expire
    /// any chunk the request carried that the new value no longer uses.
    pub fn build_chunked(&self, request_headers: &HeaderMap, value: &str) -> Vec<String> {
        let chunks = chunk_value(&self.name, value);
        let kept: Vec<&str> = chunks.iter().map(|(name, _)| name.as_str()).collect();

        let mut out: Vec<String> = chunks
            .iter()
            .map(|(name, chunk)| self.build_set_cookie_named(name, chunk))
            .collect();

        out.extend(
            stored_names(request_headers, &self.name)
                .into_iter()
                .filter(|name| !kept.contains(&name.as_str()))
                .map(|name| self.build_delete_cookie_named(&name)),
        );
        out
    }

    /// Set-Cookie values that expire the cookie and every chunk the request carried.
    pub fn build_clear_chunked(&self, request_headers: &HeaderMap) -> Vec<String> {
        let mut names = stored_names(request_headers, &self.name);
        if names.is_empty() {
            names.push(self.name.clone());
        }
        names
            .iter()
            .map(|name| self.build_delete_cookie_named(name))
            .collect()
    }
}

/// All `name=value` pairs from every Cookie header, in order
pub fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    parse_cookies(headers)
        .into_iter()
        .find_map(|(key, value)| (key == name).then_some(value))
}

/// Read a value that may have been split across `<name>.0`, `<name>.1`, ...
///
/// An unchunked cookie wins over chunks. Chunks are read until the first gap.
pub fn extract_chunked_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = parse_cookies(headers);
    let lookup = |wanted: &str| {
        cookies
            .iter()
            .find_map(|(key, value)| (key == wanted).then(|| value.clone()))
    };

    if let Some(value) = lookup(name) {
        return Some(value);
    }

    let mut joined = String::new();
    let mut index = 0usize;
    while let Some(chunk) = lookup(&format!("{}.{}", name, index)) {
        joined.push_str(&chunk);
        index += 1;
    }

    (index > 0).then_some(joined)
}

/// Split `value` into `(cookie name, chunk)` pairs of at most [`MAX_CHUNK_SIZE`] bytes
pub fn chunk_value(name: &str, value: &str) -> Vec<(String, String)> {
    if value.len() <= MAX_CHUNK_SIZE {
        return vec![(name.to_string(), value.to_string())];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for ch in value.chars() {
        if current.len() + ch.len_utf8() > MAX_CHUNK_SIZE {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| (format!("{}.{}", name, i), chunk))
        .collect()
}

/// Names of the base cookie and any of its chunks present in the request
fn stored_names(headers: &HeaderMap, name: &str) -> Vec<String> {
    let chunk_prefix = format!("{}.", name);
    parse_cookies(headers)
        .into_iter()
        .map(|(key, _)| key)
        .filter(|key| {
            key == name
                || key
                    .strip_prefix(&chunk_prefix)
                    .is_some_and(|suffix| suffix.parse::<usize>().is_ok())
        })
        .collect()
}

/// Create a Set-Cookie header value
pub fn set_cookie_header(value: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(value).ok()
}
