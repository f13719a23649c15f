//! End-to-end router tests driven through tower's oneshot
//! Run: cargo test --test api_http

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use inventory_server::db::repository::UserRepository;
use inventory_server::{Config, ServerState};

async fn test_state() -> (ServerState, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(tmp.path().to_str().unwrap(), 0);
    let state = ServerState::initialize(&config).await;
    (state, tmp)
}

fn app(state: &ServerState) -> Router {
    state.http.router().expect("router is initialized")
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(state: &ServerState, req: Request<Body>) -> (StatusCode, Value) {
    let response = app(state).oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn login(state: &ServerState, email: &str, password: &str) -> String {
    let (status, body) = send(
        state,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

async fn seed_admin(state: &ServerState, email: &str, password: &str) {
    UserRepository::new(state.get_db())
        .create(email, password, "Admin")
        .await
        .unwrap();
}

#[tokio::test]
async fn health_and_root_answer_without_a_token() {
    let (state, _guard) = test_state().await;

    let (status, body) = send(&state, request("GET", "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Server is running");
    assert!(body["timestamp"].as_str().unwrap().contains('T'));

    let response = app(&state)
        .oneshot(request("GET", "/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Inventory Management System API");

    // Non-API paths fall through the auth middleware to a plain 404
    let (status, _) = send(&state, request("GET", "/nope", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let (state, _guard) = test_state().await;

    let (status, body) = send(&state, request("GET", "/api/orders", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");
    assert_eq!(body["message"], "Please login first");

    let (status, body) = send(
        &state,
        request("GET", "/api/orders", Some("not-a-jwt"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3002");
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn catalog_routes_are_public() {
    let (state, _guard) = test_state().await;

    let (status, body) = send(&state, request("GET", "/api/products", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pages"], 0);
    assert!(body["products"].as_array().unwrap().is_empty());

    let (status, body) = send(&state, request("GET", "/api/categories", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn login_returns_the_flat_user_payload() {
    let (state, _guard) = test_state().await;
    seed_admin(&state, "admin@example.com", "secret123").await;

    let (status, body) = send(
        &state,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "admin@example.com", "password": "wrong"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3004");
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = send(
        &state,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "admin@example.com", "password": "secret123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["_id"].as_str().unwrap().starts_with("user:"));
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["isAdmin"], true);
    assert_eq!(body["role"], "Admin");
    assert!(!body["token"].as_str().unwrap().is_empty());

    // The issued token opens the profile route; the hash stays private
    let token = body["token"].as_str().unwrap();
    let (status, profile) = send(
        &state,
        request("GET", "/api/auth/profile", Some(token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "admin@example.com");
    assert!(profile.get("password").is_none());
}

#[tokio::test]
async fn login_rejects_accounts_without_admin_rights() {
    let (state, _guard) = test_state().await;
    seed_admin(&state, "clerk@example.com", "secret123").await;
    state
        .db
        .query("UPDATE user SET isAdmin = false WHERE email = $email")
        .bind(("email", "clerk@example.com".to_string()))
        .await
        .unwrap();

    let (status, body) = send(
        &state,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "clerk@example.com", "password": "secret123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");
    assert_eq!(body["message"], "Access denied. Admins only.");
}

#[tokio::test]
async fn profile_update_merges_and_reissues_the_token() {
    let (state, _guard) = test_state().await;
    seed_admin(&state, "owner@example.com", "secret123").await;
    let token = login(&state, "owner@example.com", "secret123").await;

    let (status, body) = send(
        &state,
        request(
            "PUT",
            "/api/auth/profile",
            Some(&token),
            Some(json!({"role": "Manager", "name": ""})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "Manager");
    assert_eq!(body["name"], "Admin", "blank name leaves the stored value");
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn order_create_validates_through_the_api() {
    let (state, _guard) = test_state().await;
    seed_admin(&state, "admin@example.com", "secret123").await;
    let token = login(&state, "admin@example.com", "secret123").await;

    let (status, body) = send(
        &state,
        request("POST", "/api/orders", Some(&token), Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
    assert_eq!(body["message"], "Customer and products are required");
}

#[tokio::test]
async fn stock_movements_adjust_products_over_http() {
    let (state, _guard) = test_state().await;
    seed_admin(&state, "admin@example.com", "secret123").await;
    let token = login(&state, "admin@example.com", "secret123").await;

    let (status, product) = send(
        &state,
        request(
            "POST",
            "/api/products",
            None,
            Some(json!({"name": "Power Strip", "sellingPrice": 12.5})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = product["id"].as_str().unwrap().to_string();
    assert_eq!(product["quantity"], 0);
    assert_eq!(product["inStock"], false);

    let (status, movement) = send(
        &state,
        request(
            "POST",
            "/api/stock-movements",
            Some(&token),
            Some(json!({
                "product": product_id,
                "type": "IN",
                "quantity": 8,
                "reason": "Delivery"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(movement["type"], "IN");
    assert_eq!(movement["quantity"], 8);

    let (status, fetched) = send(
        &state,
        request("GET", &format!("/api/products/{product_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["quantity"], 8);
    assert_eq!(fetched["inStock"], true);
}

#[tokio::test]
async fn category_endpoints_wrap_responses_in_envelopes() {
    let (state, _guard) = test_state().await;

    let (status, created) = send(
        &state,
        request(
            "POST",
            "/api/categories",
            None,
            Some(json!({"name": "Drinks"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["slug"], "drinks");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (_, listed) = send(&state, request("GET", "/api/categories", None, None)).await;
    assert_eq!(listed["count"], 1);

    let (status, deleted) = send(
        &state,
        request("DELETE", &format!("/api/categories/{id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], true);
    assert_eq!(deleted["message"], "Category deleted successfully");
    assert_eq!(deleted["data"]["isActive"], false);

    // Soft-deleted categories drop out of the default listing only
    let (_, listed) = send(&state, request("GET", "/api/categories", None, None)).await;
    assert_eq!(listed["count"], 0);
    let (_, all) = send(
        &state,
        request("GET", "/api/categories?includeInactive=true", None, None),
    )
    .await;
    assert_eq!(all["count"], 1);
}

#[tokio::test]
async fn settings_round_trip_over_http() {
    let (state, _guard) = test_state().await;
    seed_admin(&state, "admin@example.com", "secret123").await;
    let token = login(&state, "admin@example.com", "secret123").await;

    let (status, defaults) = send(
        &state,
        request("GET", "/api/settings", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(defaults["shopName"], "Sayan Digital");

    let (status, updated) = send(
        &state,
        request(
            "PUT",
            "/api/settings",
            Some(&token),
            Some(json!({"shopName": "My Store", "logoUrl": "https://cdn.example/logo.png"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["shopName"], "My Store");
    assert_eq!(updated["logoUrl"], "", "logo URL cannot be set through settings");

    let (_, fetched) = send(&state, request("GET", "/api/settings", Some(&token), None)).await;
    assert_eq!(fetched["shopName"], "My Store");
}
