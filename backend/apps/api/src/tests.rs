//! End-to-end tests for the assembled router
//! Gateway, record API, and blog wired together over in-memory backends

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use auth::config::AuthConfig;
    use auth::domain::backend::AuthBackend;
    use auth::domain::entity::{auth_session::AuthSession, user::User};
    use auth::{AuthError, AuthResult};
    use axum::Router;
    use cms::CmsConfig;
    use kernel::id::UserId;
    use records::{InMemoryRecords, RecordsConfig};
    use tempfile::TempDir;

    use crate::app::compose;

    pub const PROJECT: &str = "test";

    /// Auth backend that accepts exactly one access token
    #[derive(Clone)]
    pub struct StubAuth {
        pub user: User,
        pub calls: Arc<AtomicUsize>,
    }

    impl StubAuth {
        pub fn new() -> Self {
            Self {
                user: User::new(UserId::new(), Some("parent@example.com".to_string())),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AuthBackend for StubAuth {
        async fn refresh_session(&self, _refresh_token: &str) -> AuthResult<AuthSession> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::SessionInvalid)
        }

        async fn get_user(&self, access_token: &str) -> AuthResult<User> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if access_token == "valid-access" {
                Ok(self.user.clone())
            } else {
                Err(AuthError::SessionInvalid)
            }
        }

        async fn sign_in_with_password(&self, _email: &str, _password: &str) -> AuthResult<AuthSession> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::InvalidCredentials)
        }

        async fn sign_out(&self, _access_token: &str) -> AuthResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    pub struct TestApp {
        pub router: Router,
        pub auth: StubAuth,
        pub store: InMemoryRecords,
        _content: TempDir,
    }

    pub fn test_app() -> TestApp {
        let content = tempfile::tempdir().unwrap();
        std::fs::write(
            content.path().join("first-post.mdoc"),
            "---\ntitle: First Post\n---\nHello.\n",
        )
        .unwrap();

        let auth = StubAuth::new();
        let store = InMemoryRecords::new().with_structures(["hero_journey"]);
        let mut auth_config = AuthConfig::for_project(PROJECT);
        auth_config.session_cookie.secure = false;

        let router = compose(
            auth.clone(),
            auth_config,
            store.clone(),
            RecordsConfig::default(),
            CmsConfig::default().with_content_dir(content.path()),
        );

        TestApp {
            router,
            auth,
            store,
            _content: content,
        }
    }

    /// `Cookie` header line for a long-lived session
    pub fn session_cookie() -> String {
        let session = AuthSession {
            access_token: "valid-access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in: Some(3600),
            // 2100-01-01
            expires_at: Some(4_102_444_800),
            token_type: "bearer".to_string(),
            user: None,
        };
        format!(
            "sb-{}-auth-token={}",
            PROJECT,
            session.to_cookie_value().unwrap()
        )
    }
}

#[cfg(test)]
mod app_tests {
    use super::support::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_account_requires_session() {
        let app = test_app();

        let response = app
            .router
            .oneshot(request(Method::GET, "/account/children", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/sign-in");
    }

    #[tokio::test]
    async fn test_signed_in_parent_creates_and_lists_child() {
        let app = test_app();
        let cookie = session_cookie();

        let response = app
            .router
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/children",
                Some(&cookie),
                Some(json!({ "name": "Ada", "birthdate": "2020-01-01" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .router
            .oneshot(request(Method::GET, "/account/children", Some(&cookie), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["name"], "Ada");
        assert_eq!(body[0]["birthdate"], "2020-01-01");
    }

    #[tokio::test]
    async fn test_record_api_without_session_is_unauthorized() {
        let app = test_app();

        let response = app
            .router
            .oneshot(request(
                Method::POST,
                "/api/children",
                None,
                Some(json!({ "name": "Ada", "birthdate": "2020-01-01" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(app.store.calls(), 0);
    }

    #[tokio::test]
    async fn test_landing_redirects_signed_in_parent() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(request(Method::GET, "/", Some(&session_cookie()), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/account");

        let response = app
            .router
            .oneshot(request(Method::GET, "/", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["signIn"], "/sign-in");
    }

    #[tokio::test]
    async fn test_blog_is_public() {
        let app = test_app();

        let response = app
            .router
            .oneshot(request(Method::GET, "/blog/first-post", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["title"], "First Post");
    }

    #[tokio::test]
    async fn test_cms_api_bypasses_auth() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/keystatic/posts")
                    .header(header::COOKIE, session_cookie())
                    .header(header::ORIGIN, "https://editor.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://editor.example.com"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
        assert_eq!(app.auth.calls(), 0);

        let response = app
            .router
            .oneshot(request(Method::OPTIONS, "/api/keystatic/posts", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, OPTIONS, POST, DELETE"
        );
        assert_eq!(app.auth.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_session_is_cleared() {
        let app = test_app();
        let cookie = format!(
            "sb-{}-auth-token={}",
            PROJECT, "base64-not-a-session"
        );

        let response = app
            .router
            .oneshot(request(Method::GET, "/sign-in", Some(&cookie), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.starts_with("sb-test-auth-token=") && v.contains("Max-Age=0"));
        assert!(cleared);
        assert_eq!(json_body(response).await["signedIn"], false);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = test_app();

        let response = app
            .router
            .oneshot(request(Method::GET, "/nowhere", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
