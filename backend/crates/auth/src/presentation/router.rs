//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::backend::AuthBackend;
use crate::presentation::handlers::{self, AuthAppState};

/// Auth routes over the state shared with the session gateway
pub fn auth_routes<B>(state: AuthAppState<B>) -> Router
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/sign-in", post(handlers::sign_in::<B>))
        .route("/sign-out", post(handlers::sign_out::<B>))
        .route("/user", get(handlers::session_status))
        .with_state(state)
}
