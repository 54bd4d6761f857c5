//! Application Router
//!
//! Every route sits behind the session gateway; record handlers rely on the
//! `Principal` it inserts.

use anyhow::Context;
use auth::GoTrueBackend;
use auth::config::AuthConfig;
use auth::domain::backend::AuthBackend;
use auth::handlers::AuthAppState;
use auth::middleware::{CurrentUser, session_gateway};
use auth::router::auth_routes;
use axum::extract::Extension;
use axum::middleware::from_fn_with_state;
use axum::{Json, Router, routing::get};
use cms::{CmsConfig, cms_router};
use kernel::error::app_error::AppError;
use platform::client::UpstreamClient;
use records::domain::repository::{ChildRepository, StoryRepository, StoryStructureRepository};
use records::{PostgrestRecords, RecordsConfig, records_router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Build the production router from configuration
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let client =
        UpstreamClient::new(&config.upstream).context("Failed to build upstream HTTP client")?;

    Ok(compose(
        GoTrueBackend::new(client.clone()),
        config.auth_config(),
        PostgrestRecords::new(client),
        config.records_config(),
        config.cms_config(),
    ))
}

/// Assemble the router over any auth backend and record store
pub fn compose<B, R>(
    auth_backend: B,
    auth_config: AuthConfig,
    repo: R,
    records_config: RecordsConfig,
    cms_config: CmsConfig,
) -> Router
where
    B: AuthBackend + Clone + Send + Sync + 'static,
    R: ChildRepository + StoryRepository + StoryStructureRepository + Clone + Send + Sync + 'static,
{
    let gateway_state = AuthAppState::new(auth_backend, auth_config);

    Router::new()
        .route("/", get(landing))
        .route("/sign-in", get(sign_in_page))
        .nest("/auth", auth_routes(gateway_state.clone()))
        .merge(records_router(repo, records_config))
        .merge(cms_router(cms_config))
        .fallback(not_found)
        .layer(from_fn_with_state(gateway_state, session_gateway::<B>))
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LandingResponse {
    name: &'static str,
    sign_in: &'static str,
    blog: &'static str,
}

/// GET /
///
/// Signed-in visitors never get here; the gateway sends them to the account.
async fn landing() -> Json<LandingResponse> {
    Json(LandingResponse {
        name: "Lil' Bardy",
        sign_in: "/sign-in",
        blog: "/blog",
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInPageResponse {
    action: &'static str,
    fields: [&'static str; 2],
    signed_in: bool,
}

/// GET /sign-in
async fn sign_in_page(user: Option<Extension<CurrentUser>>) -> Json<SignInPageResponse> {
    Json(SignInPageResponse {
        action: "/auth/sign-in",
        fields: ["email", "password"],
        signed_in: user.is_some(),
    })
}

async fn not_found() -> AppError {
    AppError::not_found("Route not found")
}
