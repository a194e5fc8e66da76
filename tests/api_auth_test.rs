//! Integration tests for the OAuth routes

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use calbridge::api::public::GENERIC_ERROR;
    use calbridge::core::AppConfig;
    use calbridge::credentials::CredentialStore;
    use serde_json::json;
    use tower::util::ServiceExt;

    use crate::test_utils::{TestAppBuilder, body_to_json, body_to_string, test_config};

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn config_with_token_url(url: &str) -> AppConfig {
        AppConfig {
            google_token_url: url.to_string(),
            ..test_config()
        }
    }

    /// Tests the browser is sent to the consent screen
    #[tokio::test]
    async fn it_redirects_to_the_consent_screen() {
        let app = TestAppBuilder::new().unauthenticated().build();

        let response = app.router.oneshot(get("/auth")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(location.contains("client_id=test-client-id"));
        assert!(location.contains("response_type=code"));
        assert!(location.contains("access_type=offline"));
    }

    #[tokio::test]
    async fn it_returns_500_for_a_missing_code() {
        let app = TestAppBuilder::new().unauthenticated().build();

        let response = app.router.oneshot(get("/oauth2callback")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["error"], GENERIC_ERROR);
    }

    #[tokio::test]
    async fn it_returns_500_when_consent_is_denied() {
        let app = TestAppBuilder::new().unauthenticated().build();

        let response = app
            .router
            .oneshot(get("/oauth2callback?error=access_denied"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(app.credentials.get().await.unwrap().is_none());
    }

    /// Tests a successful exchange stores the credential and unlocks the
    /// calendar routes
    #[tokio::test]
    async fn it_exchanges_the_code_and_stores_the_credential() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("code".into(), "auth-code".into()),
                mockito::Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": "fresh-token",
                    "expires_in": 3599,
                    "refresh_token": "refresh",
                    "scope": "https://www.googleapis.com/auth/calendar",
                    "token_type": "Bearer"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = TestAppBuilder::new()
            .config(config_with_token_url(&format!("{}/token", server.url())))
            .unauthenticated()
            .build();

        let response = app
            .router
            .clone()
            .oneshot(get("/oauth2callback?code=auth-code"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        assert!(body.starts_with("Authentication successful!"));

        let credential = app.credentials.get().await.unwrap().unwrap();
        assert_eq!(credential.access_token, "fresh-token");
        assert_eq!(credential.refresh_token.as_deref(), Some("refresh"));

        let response = app.router.oneshot(get("/auth/status")).await.unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body, json!({"authenticated": true}));
    }

    /// Tests a rejected exchange leaves the user signed out
    #[tokio::test]
    async fn it_returns_500_when_the_exchange_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let app = TestAppBuilder::new()
            .config(config_with_token_url(&format!("{}/token", server.url())))
            .unauthenticated()
            .build();

        let response = app
            .router
            .oneshot(get("/oauth2callback?code=stale"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(app.credentials.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn it_reports_status_and_logs_out() {
        let app = TestAppBuilder::new().build();

        let response = app
            .router
            .clone()
            .oneshot(get("/auth/status"))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body, json!({"authenticated": true}));

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body, json!({"authenticated": false}));

        let response = app.router.oneshot(get("/auth/status")).await.unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body, json!({"authenticated": false}));
    }
}
