//! Session Gateway Middleware
//!
//! Runs in front of every route: CMS bypass, then session refresh, then the
//! route guard. Each stage reads the same [`RequestContext`] and returns an
//! explicit decision; nothing is shared between requests.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use kernel::error::app_error::AppError;
use kernel::principal::Principal;
use platform::cookie::{extract_chunked_cookie, set_cookie_header};

use crate::application::cms_bypass::{self, BypassDecision, CMS_ALLOWED_METHODS};
use crate::application::config::{AuthConfig, AuthFailurePolicy};
use crate::application::refresh_session::{CookieUpdate, RefreshSessionUseCase, SessionOutcome};
use crate::application::route_guard::{self, GuardDecision};
use crate::domain::backend::AuthBackend;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::presentation::handlers::AuthAppState;

/// What the gateway knows about a request, captured before it moves on
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Path without query string
    pub path: String,
    pub origin: Option<HeaderValue>,
    /// Only the `Cookie` headers of the request
    pub cookies: HeaderMap,
}

impl RequestContext {
    pub fn from_request(req: &Request<Body>) -> Self {
        let mut cookies = HeaderMap::new();
        for value in req.headers().get_all(header::COOKIE) {
            cookies.append(header::COOKIE, value.clone());
        }

        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            origin: req.headers().get(header::ORIGIN).cloned(),
            cookies,
        }
    }

    /// Raw session cookie value, joined from chunks if needed
    pub fn session_cookie(&self, config: &AuthConfig) -> Option<String> {
        extract_chunked_cookie(&self.cookies, config.session_cookie_name())
    }
}

/// Signed-in user, stored in request extensions next to the [`Principal`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Session gateway
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn session_gateway<B>(
    State(state): State<AuthAppState<B>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let ctx = RequestContext::from_request(&req);
    let config = state.config.as_ref();

    // ------------------------------------------------------------------
    // 1. CMS bypass
    // ------------------------------------------------------------------
    match cms_bypass::classify(&config.routes, &ctx.method, &ctx.path) {
        BypassDecision::Preflight => {
            tracing::debug!(path = %ctx.path, "CMS preflight");
            return preflight_response(ctx.origin.as_ref());
        }
        BypassDecision::PassThrough => {
            tracing::debug!(path = %ctx.path, method = %ctx.method, "CMS request bypasses session");
            let mut response = next.run(req).await;
            add_cms_cors_headers(response.headers_mut(), ctx.origin.as_ref());
            return response;
        }
        BypassDecision::Delegate => {}
    }

    // ------------------------------------------------------------------
    // 2. Session refresh
    // ------------------------------------------------------------------
    let use_case = RefreshSessionUseCase::new(state.backend.clone(), state.config.clone());
    let stored = ctx.session_cookie(config);
    let output = use_case.execute(stored.as_deref()).await;
    let set_cookies = cookie_headers(config, &ctx, &output.cookie);

    let signed_in: Option<(User, AuthSession)> = match output.outcome {
        SessionOutcome::Authenticated { user, session } => Some((user, session)),
        SessionOutcome::Unauthenticated => None,
        SessionOutcome::UpstreamError(e) => match config.failure_policy {
            AuthFailurePolicy::TreatAsSignedOut => {
                tracing::warn!(error = %e, path = %ctx.path, "Auth backend unavailable, continuing signed out");
                None
            }
            AuthFailurePolicy::ServiceUnavailable => {
                tracing::error!(error = %e, path = %ctx.path, "Auth backend unavailable, refusing request");
                let mut response =
                    AppError::service_unavailable("Authentication service unavailable")
                        .with_action("Try again in a moment")
                        .into_response();
                append_set_cookies(&mut response, &set_cookies);
                return response;
            }
        },
    };

    // ------------------------------------------------------------------
    // 3. Route guard
    // ------------------------------------------------------------------
    let decision = route_guard::decide(&config.routes, &ctx.path, signed_in.is_some());
    tracing::debug!(
        path = %ctx.path,
        user_id = ?signed_in.as_ref().map(|(user, _)| user.id),
        decision = ?decision,
        "Route guard"
    );

    let mut response = match decision.location(&config.routes) {
        Some(location) => Redirect::to(location).into_response(),
        None => {
            if let Some((user, session)) = signed_in {
                req.extensions_mut().insert(Principal::new(
                    user.id,
                    user.email.clone(),
                    session.access_token,
                ));
                req.extensions_mut().insert(CurrentUser(user));
            }
            next.run(req).await
        }
    };

    // A handler that wrote the session cookie itself (sign-in, sign-out) wins.
    if !sets_cookie(response.headers(), config.session_cookie_name()) {
        append_set_cookies(&mut response, &set_cookies);
    }
    response
}

// ============================================================================
// CORS for CMS paths
// ============================================================================

fn allow_origin(origin: Option<&HeaderValue>) -> HeaderValue {
    origin
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"))
}

fn preflight_response(origin: Option<&HeaderValue>) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin(origin));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CMS_ALLOWED_METHODS),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    response
}

fn add_cms_cors_headers(headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin(origin));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

// ============================================================================
// Session cookie
// ============================================================================

fn cookie_headers(config: &AuthConfig, ctx: &RequestContext, update: &CookieUpdate) -> Vec<String> {
    match update {
        CookieUpdate::Keep => Vec::new(),
        CookieUpdate::Write(session) => match session.to_cookie_value() {
            Ok(value) => config.session_cookie.build_chunked(&ctx.cookies, &value),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode session cookie");
                Vec::new()
            }
        },
        CookieUpdate::Clear => config.session_cookie.build_clear_chunked(&ctx.cookies),
    }
}

/// Append `Set-Cookie` headers; values that are not valid header text are dropped.
pub fn append_set_cookies(response: &mut Response, cookies: &[String]) {
    for cookie in cookies {
        match set_cookie_header(cookie) {
            Some(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            None => tracing::error!("Dropping invalid Set-Cookie value"),
        }
    }
}

/// True when the response already sets `name` or one of its chunks
fn sets_cookie(headers: &HeaderMap, name: &str) -> bool {
    let chunk_prefix = format!("{}.", name);
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split_once('=').map(|(key, _)| key.trim()))
        .any(|key| key == name || key.starts_with(&chunk_prefix))
}
