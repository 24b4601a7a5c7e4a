use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware::{logging_middleware, security::MAX_BODY_SIZE, security_headers_middleware};
use super::state::AppState;
use super::users;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api/auth", auth::create_auth_router())
        .nest("/api/users", users::create_users_router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::pagination::CursorCodec;
    use crate::infrastructure::auth::{JwtConfig, JwtService};
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

    const ADMIN_EMAIL: &str = "admin@example.com";
    const PASSWORD: &str = "SecurePassword123!";

    async fn test_app() -> Router {
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::with_params(1024, 1, 1).unwrap()),
            CursorCodec::new("test-cursor-secret"),
        );
        assert!(service.create_admin(ADMIN_EMAIL, PASSWORD).await.unwrap());

        let state = AppState::new(
            Arc::new(service),
            Arc::new(JwtService::new(JwtConfig::new("test-jwt-secret", 1))),
        );

        create_router_with_state(state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    async fn register(app: &Router, email: &str) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": email,
                "password": PASSWORD,
                "first_name": "Test",
                "last_name": "User"
            })),
        )
        .await
    }

    async fn login(app: &Router, email: &str) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": PASSWORD })),
        )
        .await
    }

    async fn admin_token(app: &Router) -> String {
        let (_, body) = login(app, ADMIN_EMAIL).await;
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&app, Method::GET, "/live", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "user_store");
    }

    #[tokio::test]
    async fn test_register_and_duplicate() {
        let app = test_app().await;

        let (status, body) = register(&app, "New@Example.com").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "new@example.com");
        assert_eq!(body["reactivated"], false);
        assert!(body["token"].as_str().is_some());
        assert!(body["user"].get("password_hash").is_none());

        let (status, body) = register(&app, "new@example.com").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "User already exists.");
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let app = test_app().await;

        let (status, body) = register(&app, "no-at-sign").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app = test_app().await;
        register(&app, "user@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "user@example.com", "password": "WrongPassword1!" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let app = test_app().await;

        let (status, _) = send(&app, Method::GET, "/api/users/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/api/users/me", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_me() {
        let app = test_app().await;
        let (_, body) = register(&app, "user@example.com").await;
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/users/me",
            Some(&token),
            Some(json!({ "first_name": "Changed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_name"], "Changed");
        assert_eq!(body["last_name"], "User");

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/users/me",
            Some(&token),
            Some(json!({ "last_name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/users/me",
            Some(&token),
            Some(json!({ "email": ADMIN_EMAIL })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete_me_then_login_reactivates() {
        let app = test_app().await;
        let (_, body) = register(&app, "user@example.com").await;
        let token = body["token"].as_str().unwrap().to_string();
        let id = body["user"]["id"].as_i64().unwrap();

        let (status, body) = send(&app, Method::DELETE, "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "deleted": true }));

        // The old token no longer authenticates a deleted account
        let (status, _) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin = admin_token(&app).await;
        let (status, _) =
            send(&app, Method::GET, &format!("/api/users/{}", id), Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = login(&app, "user@example.com").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["reactivated"], true);

        let (status, _) =
            send(&app, Method::GET, &format!("/api/users/{}", id), Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let app = test_app().await;
        let admin = admin_token(&app).await;

        let (status, body) = send(&app, Method::GET, "/api/users/999", Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "User not found.");
    }

    #[tokio::test]
    async fn test_list_open_to_any_authenticated_user() {
        let app = test_app().await;
        let (_, body) = register(&app, "user@example.com").await;
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::GET, "/api/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "User is not authenticated");

        let (status, body) = send(&app, Method::GET, "/api/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["page"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_non_numeric_user_id_uses_error_envelope() {
        let app = test_app().await;
        let admin = admin_token(&app).await;

        let (status, body) = send(&app, Method::GET, "/api/users/abc", Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["code"], "path_parse_error");
    }

    #[tokio::test]
    async fn test_list_walks_all_pages() {
        let app = test_app().await;
        for i in 0..4 {
            register(&app, &format!("user{}@example.com", i)).await;
        }
        let admin = admin_token(&app).await;

        let mut emails = Vec::new();
        let mut uri = "/api/users?limit=2".to_string();
        loop {
            let (status, body) = send(&app, Method::GET, &uri, Some(&admin), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["page"]["limit"], 2);

            for item in body["items"].as_array().unwrap() {
                emails.push(item["email"].as_str().unwrap().to_string());
            }

            match body["page"]["next_cursor"].as_str() {
                Some(cursor) => {
                    assert_eq!(body["page"]["has_next"], true);
                    uri = format!("/api/users?limit=2&cursor={}", cursor);
                }
                None => {
                    assert_eq!(body["page"]["has_next"], false);
                    break;
                }
            }
        }

        assert_eq!(
            emails,
            vec![
                ADMIN_EMAIL,
                "user0@example.com",
                "user1@example.com",
                "user2@example.com",
                "user3@example.com"
            ]
        );
    }

    #[tokio::test]
    async fn test_list_default_limit_and_search() {
        let app = test_app().await;
        register(&app, "alice@example.com").await;
        register(&app, "bob@example.com").await;
        let admin = admin_token(&app).await;

        let (status, body) = send(&app, Method::GET, "/api/users", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"]["limit"], 20);
        assert_eq!(body["items"].as_array().unwrap().len(), 3);

        let (_, body) = send(
            &app,
            Method::GET,
            "/api/users?searchString=ALICE",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);

        let (_, body) = send(
            &app,
            Method::GET,
            "/api/users?searchString=ALICE&searchIgnoreCase=false",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(body["items"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_limit() {
        let app = test_app().await;
        let admin = admin_token(&app).await;

        for uri in ["/api/users?limit=0", "/api/users?limit=101", "/api/users?limit=-1"] {
            let (status, _) = send(&app, Method::GET, uri, Some(&admin), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_list_rejects_bad_cursors() {
        let app = test_app().await;
        for i in 0..3 {
            register(&app, &format!("user{}@example.com", i)).await;
        }
        let admin = admin_token(&app).await;

        let (status, body) =
            send(&app, Method::GET, "/api/users?cursor=not-a-cursor", Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid cursor.");
        assert_eq!(body["error"]["code"], "invalid_cursor");

        let (_, body) = send(&app, Method::GET, "/api/users?limit=1", Some(&admin), None).await;
        let cursor = body["page"]["next_cursor"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/users?limit=1&cursor={}&searchString=user", cursor),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Cursor does not match request filters.");
        assert_eq!(body["error"]["code"], "cursor_filter_mismatch");

        // Page size is not part of the cursor context
        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/users?limit=3&cursor={}", cursor),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
