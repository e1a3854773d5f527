use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use pocketkit::config::{Config, StorageBackend};
use tower::ServiceExt;

fn test_config() -> Config {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Memory;
    config.agent.enabled = false;
    config.security.argon2_memory_cost_kib = 64;
    config.security.argon2_time_cost = 1;
    config
}

fn spawn_app_with(config: Config) -> Router {
    let state = pocketkit::api::create_app_state_from_config(config, None)
        .expect("Failed to create app state");
    pocketkit::api::router(state)
}

fn spawn_app() -> Router {
    spawn_app_with(test_config())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn register(app: &Router, username: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        post_json(
            "/register",
            serde_json::json!({
                "username": username,
                "email": "someone@example.com",
                "password": "correct horse",
            }),
        ),
    )
    .await
}

#[tokio::test]
async fn test_register_returns_token() {
    let app = spawn_app();

    let (status, body) = register(&app, "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "simple-token-alice");
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["premium"], false);
}

#[tokio::test]
async fn test_duplicate_registration_is_bad_request() {
    let app = spawn_app();

    let (status, _) = register(&app, "alice").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = register(&app, "  alice ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Username already registered");
}

#[tokio::test]
async fn test_trimmed_username_login() {
    let app = spawn_app();

    let (_, body) = register(&app, "  alice  ").await;
    assert_eq!(body["username"], "alice");

    for name in ["alice", "  alice  "] {
        let (status, body) = send(
            &app,
            post_json(
                "/login",
                serde_json::json!({"username": name, "password": "correct horse"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["access_token"], "simple-token-alice");
    }
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let app = spawn_app();
    register(&app, "bob").await;

    let (status, body) = send(
        &app,
        post_json(
            "/login",
            serde_json::json!({"username": "bob", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect username or password");

    let (status, _) = send(
        &app,
        post_json(
            "/login",
            serde_json::json!({"username": "nobody", "password": "correct horse"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_users_me_via_header_and_query() {
    let app = spawn_app();
    register(&app, "alice").await;

    let (status, body) = send(&app, get_with_token("/users/me", "simple-token-alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"username": "alice", "premium": false}));

    let (status, body) = send(&app, get("/users/me?token=simple-token-alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn test_header_wins_over_query() {
    let app = spawn_app();
    register(&app, "alice").await;

    // Header names an unknown user, query names a real one: header decides.
    let (status, _) = send(
        &app,
        get_with_token("/users/me?token=simple-token-alice", "simple-token-ghost"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_users_me_rejections() {
    let app = spawn_app();
    register(&app, "alice").await;

    let (status, body) = send(&app, get("/users/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");

    let (status, body) = send(&app, get_with_token("/users/me", "eyJhbGciOi.x.y")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token format");

    let (status, body) = send(&app, get_with_token("/users/me", "simple-token-ghost")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_upgrade_premium() {
    let app = spawn_app();
    register(&app, "carol").await;

    let (status, body) = send(&app, post_json("/upgrade-premium/carol", serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "carol");
    assert_eq!(body["premium"], true);

    // Idempotent
    let (status, body) = send(&app, post_json("/upgrade-premium/carol", serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["premium"], true);

    let (_, body) = send(&app, get_with_token("/users/me", "simple-token-carol")).await;
    assert_eq!(body["premium"], true);

    let (status, _) = send(&app, post_json("/upgrade-premium/ghost", serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_premium_gate() {
    let app = spawn_app();
    register(&app, "dave").await;

    let (status, body) = send(&app, get_with_token("/premium/features", "simple-token-dave")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Premium feature required");
    assert_eq!(body["upgrade_url"], "/premium/upgrade");

    let (status, body) = send(
        &app,
        get_with_token("/premium/currency-convert/100/USD/EUR", "simple-token-dave"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Upgrade to premium to access currency conversion"
    );

    send(&app, post_json("/upgrade-premium/dave", serde_json::json!({}))).await;

    let (status, body) = send(&app, get_with_token("/premium/features", "simple-token-dave")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], "dave");

    let (status, body) = send(
        &app,
        get_with_token("/premium/currency-convert/100/USD/EUR", "simple-token-dave"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["converted_amount"], 85.0);

    let (status, _) = send(
        &app,
        get_with_token("/premium/currency-convert/100/USD/XYZ", "simple-token-dave"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_premium_gate_requires_auth_first() {
    let app = spawn_app();

    let (status, _) = send(&app, get("/premium/analytics")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_listing_and_status() {
    let app = spawn_app();
    register(&app, "zed").await;
    register(&app, "amy").await;

    let (status, body) = send(&app, get("/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_users"], 2);
    assert_eq!(body["users"], serde_json::json!(["amy", "zed"]));

    let (_, body) = send(&app, get("/auth/status")).await;
    assert_eq!(body["database"], "memory");

    let (status, body) = send(&app, get_with_token("/api/status", "simple-token-amy")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features_available"][2], "basic_features");
}

#[tokio::test]
async fn test_token_check() {
    let app = spawn_app();

    let (_, body) = send(&app, get("/debug/token-check?token=simple-token-x")).await;
    assert_eq!(body["token_type"], "query");
    assert_eq!(body["is_valid"], true);

    let (_, body) = send(&app, get("/debug/token-check")).await;
    assert_eq!(body["token_type"], "none");
    assert_eq!(body["is_valid"], false);
}

#[tokio::test]
async fn test_file_backend_persists_across_restarts() {
    let users_file = std::env::temp_dir()
        .join(format!("pocketkit-api-test-{}", uuid::Uuid::new_v4()))
        .join("users.json");

    let mut config = test_config();
    config.storage.backend = StorageBackend::File;
    config.storage.users_file = users_file.display().to_string();

    let app = spawn_app_with(config.clone());
    let (status, _) = register(&app, "erin").await;
    assert_eq!(status, StatusCode::OK);

    let contents = std::fs::read_to_string(&users_file).unwrap();
    assert!(contents.contains("\"hashed_password\""));
    assert!(!contents.contains("correct horse"));

    let restarted = spawn_app_with(config);
    let (status, body) = send(&restarted, get_with_token("/users/me", "simple-token-erin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "erin");

    let (_, body) = send(&restarted, get("/auth/status")).await;
    assert_eq!(body["database"], "local_file");
}

#[tokio::test]
async fn test_ai_chat_when_agent_disabled() {
    let app = spawn_app();
    register(&app, "fay").await;

    let request = Request::builder()
        .method("POST")
        .uri("/ai/chat")
        .header("Authorization", "Bearer simple-token-fay")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"message": "hi"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, body) = send(&app, get("/ai/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "offline");
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_login_against_sha256_user_file() {
    let users_file = std::env::temp_dir()
        .join(format!("pocketkit-api-test-{}", uuid::Uuid::new_v4()))
        .join("local_users.json");
    std::fs::create_dir_all(users_file.parent().unwrap()).unwrap();
    std::fs::write(
        &users_file,
        serde_json::json!({
            "alice": {
                "username": "alice",
                "email": "alice@example.com",
                "full_name": "Alice",
                // sha256("secret")
                "hashed_password": "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b",
                "premium": true,
                "created_at": "2024-01-01T00:00:00"
            },
            "mallory": {
                "username": "mallory",
                "email": "mallory@example.com",
                "hashed_password": "not-a-hash",
                "created_at": "2024-01-01T00:00:00"
            }
        })
        .to_string(),
    )
    .unwrap();

    let mut config = test_config();
    config.storage.backend = StorageBackend::File;
    config.storage.users_file = users_file.display().to_string();
    let app = spawn_app_with(config);

    let login = |username: &str, password: &str| {
        post_json(
            "/login",
            serde_json::json!({"username": username, "password": password}),
        )
    };

    let (status, body) = send(&app, login("alice", "wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect username or password");

    let (status, body) = send(&app, login("mallory", "anything")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, login("alice", "secret")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "simple-token-alice");
    assert_eq!(body["premium"], true);

    // Rehashed on the successful login, and still usable afterwards.
    let contents: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&users_file).unwrap()).unwrap();
    let stored = contents["alice"]["hashed_password"].as_str().unwrap();
    assert!(stored.starts_with("$argon2id$"));
    assert_eq!(contents["alice"]["premium"], true);

    let (status, _) = send(&app, login("alice", "secret")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_bodies_use_error_json() {
    let app = spawn_app();

    let (status, body) = send(&app, post_json("/register", serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("username"));

    let (status, body) = send(
        &app,
        post_json("/register", serde_json::json!({"username": "zoe", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .body(Body::from("username=zoe"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_premium_analytics_hint() {
    let app = spawn_app();
    register(&app, "gus").await;

    let (status, body) = send(&app, get_with_token("/premium/analytics", "simple-token-gus")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Premium feature required");
    assert_eq!(body["message"], "Upgrade to premium to access advanced analytics");
    assert_eq!(body["upgrade_url"], "/premium/upgrade");

    let (_, body) = send(&app, get_with_token("/premium/features", "simple-token-gus")).await;
    assert_eq!(body["message"], "Upgrade to premium to access exclusive features");

    send(&app, post_json("/upgrade-premium/gus", serde_json::json!({}))).await;

    let (status, body) = send(&app, get_with_token("/premium/analytics", "simple-token-gus")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], "gus");
}
