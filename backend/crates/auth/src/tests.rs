//! Unit tests for Auth crate
//! Session gateway, refresher, and auth endpoints against an in-memory backend

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::StatusCode;
    use chrono::Utc;
    use kernel::id::UserId;
    use platform::client::UpstreamError;

    use crate::domain::backend::AuthBackend;
    use crate::domain::entity::{auth_session::AuthSession, user::User};
    use crate::error::{AuthError, AuthResult};

    pub const COOKIE_NAME: &str = "sb-test-auth-token";
    pub const GOOD_PASSWORD: &str = "correct horse";

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Mode {
        Valid,
        Rejects,
        Down,
    }

    /// Auth backend that answers from memory and counts calls
    #[derive(Clone)]
    pub struct MockBackend {
        pub mode: Mode,
        pub user: User,
        pub calls: Arc<AtomicUsize>,
        pub refreshes: Arc<AtomicUsize>,
        pub sign_outs: Arc<AtomicUsize>,
    }

    impl MockBackend {
        pub fn new(mode: Mode) -> Self {
            Self {
                mode,
                user: User::new(UserId::new(), Some("parent@example.com".to_string())),
                calls: Arc::new(AtomicUsize::new(0)),
                refreshes: Arc::new(AtomicUsize::new(0)),
                sign_outs: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn refreshes(&self) -> usize {
            self.refreshes.load(Ordering::SeqCst)
        }

        fn fail(&self) -> AuthError {
            match self.mode {
                Mode::Rejects => AuthError::SessionInvalid,
                _ => AuthError::Upstream(UpstreamError::Status {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: "down".into(),
                }),
            }
        }
    }

    impl AuthBackend for MockBackend {
        async fn refresh_session(&self, _refresh_token: &str) -> AuthResult<AuthSession> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                Mode::Valid => Ok(session("refreshed-access", 3600)),
                _ => Err(self.fail()),
            }
        }

        async fn get_user(&self, _access_token: &str) -> AuthResult<User> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                Mode::Valid => Ok(self.user.clone()),
                _ => Err(self.fail()),
            }
        }

        async fn sign_in_with_password(&self, _email: &str, password: &str) -> AuthResult<AuthSession> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if password == GOOD_PASSWORD {
                Ok(session("signed-in-access", 3600).with_user(self.user.clone()))
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }

        async fn sign_out(&self, _access_token: &str) -> AuthResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sign_outs.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                Mode::Down => Err(self.fail()),
                _ => Ok(()),
            }
        }
    }

    pub fn session(access_token: &str, expires_in: i64) -> AuthSession {
        AuthSession {
            access_token: access_token.to_string(),
            refresh_token: "refresh".to_string(),
            expires_in: Some(3600),
            expires_at: Some(Utc::now().timestamp() + expires_in),
            token_type: "bearer".to_string(),
            user: None,
        }
    }

    /// `Cookie` header line carrying a session that expires in `expires_in` seconds
    pub fn cookie_line(expires_in: i64) -> String {
        let value = session("access", expires_in).to_cookie_value().unwrap();
        format!("{}={}", COOKIE_NAME, value)
    }
}

#[cfg(test)]
mod refresh_tests {
    use super::support::*;
    use crate::application::config::AuthConfig;
    use crate::application::refresh_session::{CookieUpdate, RefreshSessionUseCase, SessionOutcome};
    use chrono::Utc;
    use std::sync::Arc;

    fn use_case(backend: &MockBackend) -> RefreshSessionUseCase<MockBackend> {
        RefreshSessionUseCase::new(Arc::new(backend.clone()), Arc::new(AuthConfig::default()))
    }

    #[tokio::test]
    async fn test_no_cookie_makes_no_backend_call() {
        let backend = MockBackend::new(Mode::Valid);
        let output = use_case(&backend).execute(None).await;

        assert!(matches!(output.outcome, SessionOutcome::Unauthenticated));
        assert_eq!(output.cookie, CookieUpdate::Keep);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_fresh_session_is_verified_without_refresh() {
        let backend = MockBackend::new(Mode::Valid);
        let value = session("access", 3600).to_cookie_value().unwrap();

        let output = use_case(&backend).execute(Some(&value)).await;

        assert_eq!(output.outcome.user(), Some(&backend.user));
        assert_eq!(output.cookie, CookieUpdate::Keep);
        assert_eq!(backend.refreshes(), 0);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_expiring_session_is_refreshed_and_rewritten() {
        let backend = MockBackend::new(Mode::Valid);
        let value = session("access", 30).to_cookie_value().unwrap();

        let output = use_case(&backend).execute(Some(&value)).await;

        assert_eq!(backend.refreshes(), 1);
        match output.cookie {
            CookieUpdate::Write(session) => {
                assert_eq!(session.access_token, "refreshed-access");
                assert_eq!(session.user.as_ref(), Some(&backend.user));
            }
            other => panic!("expected rewritten cookie, got {:?}", other),
        }
        assert!(matches!(output.outcome, SessionOutcome::Authenticated { .. }));
    }

    #[tokio::test]
    async fn test_rejected_refresh_clears_cookie() {
        let backend = MockBackend::new(Mode::Rejects);
        let value = session("access", 10).to_cookie_value().unwrap();

        let output = use_case(&backend).execute(Some(&value)).await;

        assert!(matches!(output.outcome, SessionOutcome::Unauthenticated));
        assert_eq!(output.cookie, CookieUpdate::Clear);
    }

    #[tokio::test]
    async fn test_backend_down_is_upstream_error() {
        let backend = MockBackend::new(Mode::Down);
        let value = session("access", 3600).to_cookie_value().unwrap();

        let output = use_case(&backend).execute(Some(&value)).await;

        assert!(matches!(output.outcome, SessionOutcome::UpstreamError(_)));
        assert_eq!(output.cookie, CookieUpdate::Keep);
    }

    #[tokio::test]
    async fn test_extreme_expiry_values_are_handled() {
        let backend = MockBackend::new(Mode::Valid);

        // Long past: refreshed like any expiring session
        let past = r#"{"access_token":"a","refresh_token":"r","expires_at":-9223372036854775808}"#;
        let output = use_case(&backend).execute(Some(past)).await;
        assert_eq!(backend.refreshes(), 1);
        assert!(matches!(output.cookie, CookieUpdate::Write(_)));
        assert!(matches!(output.outcome, SessionOutcome::Authenticated { .. }));

        // Far future: verified without a refresh
        let future = r#"{"access_token":"a","refresh_token":"r","expires_at":9223372036854775807}"#;
        let output = use_case(&backend).execute(Some(future)).await;
        assert_eq!(backend.refreshes(), 1);
        assert_eq!(output.cookie, CookieUpdate::Keep);
    }

    #[tokio::test]
    async fn test_garbage_cookie_is_cleared_without_call() {
        let backend = MockBackend::new(Mode::Valid);
        let output = use_case(&backend)
            .execute_at(Some("base64-%%%"), Utc::now())
            .await;

        assert!(matches!(output.outcome, SessionOutcome::Unauthenticated));
        assert_eq!(output.cookie, CookieUpdate::Clear);
        assert_eq!(backend.calls(), 0);
    }
}

#[cfg(test)]
mod gateway_tests {
    use super::support::*;
    use crate::application::config::{AuthConfig, AuthFailurePolicy};
    use crate::presentation::{AuthAppState, auth_routes, session_gateway};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::response::Response;
    use axum::routing::get;
    use kernel::principal::Principal;
    use tower::ServiceExt;

    fn config() -> AuthConfig {
        let mut config = AuthConfig::for_project("test");
        config.session_cookie.secure = false;
        config
    }

    fn app(backend: MockBackend, config: AuthConfig) -> Router {
        let state = AuthAppState::new(backend, config);

        Router::new()
            .route("/", get(|| async { "landing" }))
            .route(
                "/account",
                get(|principal: Principal| async move { principal.user_id.to_string() }),
            )
            .route("/account/children", get(|| async { "children" }))
            .route("/blog", get(|| async { "blog" }))
            .route(
                "/api/keystatic/{*rest}",
                get(|| async { "cms" }).post(|| async { "cms-post" }),
            )
            .nest("/auth", auth_routes(state.clone()))
            .layer(from_fn_with_state(state, session_gateway::<MockBackend>))
    }

    async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ------------------------------------------------------------------
    // CMS bypass
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_cms_paths_never_call_auth_backend() {
        let backend = MockBackend::new(Mode::Valid);
        let cookie = cookie_line(10);

        let request = Request::builder()
            .uri("/api/keystatic/tree")
            .header(header::ORIGIN, "https://cms.example")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = send(app(backend.clone(), config()), request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://cms.example"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
        assert!(set_cookies(&response).is_empty());
        assert_eq!(body_text(response).await, "cms");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_cms_preflight_short_circuits() {
        let backend = MockBackend::new(Mode::Valid);

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/keystatic/tree")
            .header(header::ORIGIN, "https://cms.example")
            .body(Body::empty())
            .unwrap();
        let response = send(app(backend.clone(), config()), request).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, OPTIONS, POST, DELETE"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://cms.example"
        );
        assert_eq!(backend.calls(), 0);
    }

    // ------------------------------------------------------------------
    // Route guard
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_protected_path_without_session_redirects_to_sign_in() {
        let backend = MockBackend::new(Mode::Valid);

        for (method, uri) in [
            (Method::GET, "/account"),
            (Method::GET, "/account/children?tab=all"),
            (Method::POST, "/account"),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = send(app(backend.clone(), config()), request).await;

            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
            assert_eq!(location(&response), "/sign-in");
        }
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_signed_in_user_reaches_account_with_principal() {
        let backend = MockBackend::new(Mode::Valid);
        let cookie = cookie_line(3600);

        let response = send(
            app(backend.clone(), config()),
            get_with_cookie("/account", Some(&cookie)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, backend.user.id.to_string());
    }

    #[tokio::test]
    async fn test_landing_redirects_signed_in_user() {
        let backend = MockBackend::new(Mode::Valid);
        let cookie = cookie_line(3600);

        let response = send(
            app(backend.clone(), config()),
            get_with_cookie("/", Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/account");

        let response = send(app(backend, config()), get_with_cookie("/", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "landing");
    }

    // ------------------------------------------------------------------
    // Session refresh through the gateway
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_expiring_session_sets_refreshed_cookie() {
        let backend = MockBackend::new(Mode::Valid);
        let cookie = cookie_line(20);

        let response = send(
            app(backend.clone(), config()),
            get_with_cookie("/blog", Some(&cookie)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.refreshes(), 1);
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with(&format!("{}=base64-", COOKIE_NAME)));
    }

    #[tokio::test]
    async fn test_redirect_carries_refreshed_cookie() {
        let backend = MockBackend::new(Mode::Valid);
        let cookie = cookie_line(20);

        let response = send(
            app(backend.clone(), config()),
            get_with_cookie("/", Some(&cookie)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(!set_cookies(&response).is_empty());
    }

    #[tokio::test]
    async fn test_rejected_session_is_cleared_and_redirected() {
        let backend = MockBackend::new(Mode::Rejects);
        let cookie = cookie_line(3600);

        let response = send(
            app(backend, config()),
            get_with_cookie("/account", Some(&cookie)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/sign-in");
        let cookies = set_cookies(&response);
        assert!(
            cookies
                .iter()
                .any(|c| c.starts_with(COOKIE_NAME) && c.contains("Max-Age=0"))
        );
    }

    #[tokio::test]
    async fn test_chunked_session_cookie_is_read() {
        let backend = MockBackend::new(Mode::Valid);
        let value = session("access", 3600).to_cookie_value().unwrap();
        let (head, tail) = value.split_at(value.len() / 2);
        let cookie = format!("{0}.0={1}; {0}.1={2}", COOKIE_NAME, head, tail);

        let response = send(
            app(backend.clone(), config()),
            get_with_cookie("/account", Some(&cookie)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.calls(), 1);
    }

    // ------------------------------------------------------------------
    // Failure policy
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_backend_down_treated_as_signed_out_by_default() {
        let backend = MockBackend::new(Mode::Down);
        let cookie = cookie_line(3600);

        let response = send(
            app(backend.clone(), config()),
            get_with_cookie("/account", Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/sign-in");
        // Session kept for when the backend is back
        assert!(set_cookies(&response).is_empty());

        let response = send(
            app(backend, config()),
            get_with_cookie("/blog", Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_backend_down_fails_closed_when_configured() {
        let backend = MockBackend::new(Mode::Down);
        let cookie = cookie_line(3600);
        let mut config = config();
        config.failure_policy = AuthFailurePolicy::ServiceUnavailable;

        let response = send(app(backend, config), get_with_cookie("/blog", Some(&cookie))).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    // ------------------------------------------------------------------
    // Auth endpoints
    // ------------------------------------------------------------------

    fn sign_in_request(password: &str) -> Request<Body> {
        let body = serde_json::json!({ "email": "parent@example.com", "password": password });
        Request::builder()
            .method(Method::POST)
            .uri("/auth/sign-in")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_sets_cookie_and_redirects() {
        let backend = MockBackend::new(Mode::Valid);

        let response = send(app(backend, config()), sign_in_request(GOOD_PASSWORD)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/account");
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with(&format!("{}=base64-", COOKIE_NAME)));
        assert!(cookies[0].contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_sign_in_with_wrong_password() {
        let backend = MockBackend::new(Mode::Valid);

        let response = send(app(backend, config()), sign_in_request("nope")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookies(&response).is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_clears_cookie_even_when_backend_down() {
        let backend = MockBackend::new(Mode::Down);
        let cookie = cookie_line(3600);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/sign-out")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = send(app(backend.clone(), config()), request).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/sign-in");
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].contains("Max-Age=0"));
        assert_eq!(
            backend.sign_outs.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn test_session_status() {
        let backend = MockBackend::new(Mode::Valid);
        let cookie = cookie_line(3600);

        let response = send(
            app(backend.clone(), config()),
            get_with_cookie("/auth/user", Some(&cookie)),
        )
        .await;
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["authenticated"], true);
        assert_eq!(json["user"]["email"], "parent@example.com");

        let response = send(app(backend, config()), get_with_cookie("/auth/user", None)).await;
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["authenticated"], false);
        assert!(json.get("user").is_none());
    }
}
