//! HTTP Handlers

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{SignInInput, SignInUseCase, SignOutUseCase};
use crate::domain::backend::AuthBackend;
use crate::domain::entity::auth_session::AuthSession;
use crate::error::AuthResult;
use crate::presentation::dto::{SessionStatusResponse, SignInRequest, UserResponse};
use crate::presentation::middleware::{CurrentUser, append_set_cookies};

/// Shared state for auth handlers and the session gateway
#[derive(Clone)]
pub struct AuthAppState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub config: Arc<AuthConfig>,
}

impl<B> AuthAppState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub fn new(backend: B, config: AuthConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /auth/sign-in
pub async fn sign_in<B>(
    State(state): State<AuthAppState<B>>,
    headers: HeaderMap,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.backend.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let value = output.session.to_cookie_value()?;
    let cookies = state.config.session_cookie.build_chunked(&headers, &value);

    let mut response = Redirect::to(&state.config.routes.account_path).into_response();
    append_set_cookies(&mut response, &cookies);
    Ok(response)
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /auth/sign-out
pub async fn sign_out<B>(
    State(state): State<AuthAppState<B>>,
    headers: HeaderMap,
    principal: Option<Principal>,
) -> Response
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    // The gateway's principal carries the freshest token; fall back to the
    // stored cookie when the backend could not verify it.
    let access_token = principal.map(|p| p.access_token).or_else(|| {
        platform::cookie::extract_chunked_cookie(&headers, state.config.session_cookie_name())
            .and_then(|raw| AuthSession::from_cookie_value(&raw))
            .map(|session| session.access_token)
    });

    if let Some(token) = access_token {
        let use_case = SignOutUseCase::new(state.backend.clone());
        // Ignore errors - just clear the cookie
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Backend sign-out failed, clearing cookie anyway");
        }
    }

    let cookies = state.config.session_cookie.build_clear_chunked(&headers);

    let mut response = Redirect::to(&state.config.routes.sign_in_path).into_response();
    append_set_cookies(&mut response, &cookies);
    response
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /auth/user
pub async fn session_status(
    current: Option<Extension<CurrentUser>>,
) -> Json<SessionStatusResponse> {
    match current {
        Some(Extension(CurrentUser(user))) => Json(SessionStatusResponse {
            authenticated: true,
            user: Some(UserResponse::from(&user)),
        }),
        None => Json(SessionStatusResponse {
            authenticated: false,
            user: None,
        }),
    }
}
