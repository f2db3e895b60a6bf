use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use tower::ServiceExt as _;
use uuid::Uuid;

use bazaar_auth_types::identity::SessionSecret;
use bazaar_core::middleware::REQUEST_ID_HEADER;
use bazaar_store::router::build_router;
use bazaar_store::state::AppState;
use bazaar_testing::auth::{MockAuth, TEST_SESSION_SECRET};
use bazaar_testing::body::json_body;

/// Router over a disconnected database: only paths that answer before
/// touching storage can succeed.
fn app() -> axum::Router {
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        session_secret: SessionSecret::new(TEST_SESSION_SECRET),
        cookie_domain: String::new(),
        session_ttl_secs: 3600,
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(
    method: &str,
    uri: &str,
    auth: Option<&MockAuth>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::COOKIE, auth.cookie());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn should_answer_healthz_with_request_id() {
    let response = app().oneshot(get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let response = app().oneshot(get("/readyz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_validate_pincode_without_login() {
    let request = send_json(
        "POST",
        "/pincode/validate",
        None,
        serde_json::json!({ "pincode": "110001" }),
    );

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["valid"], true);
    assert_eq!(json["message"], "Valid PIN code");
    assert_eq!(json["region"], "Delhi");
}

#[tokio::test]
async fn should_report_invalid_pincode() {
    let request = send_json(
        "POST",
        "/pincode/validate",
        None,
        serde_json::json!({ "pincode": "11001" }),
    );

    let response = app().oneshot(request).await.unwrap();

    let json = json_body(response).await;
    assert_eq!(json["valid"], false);
    assert_eq!(json["message"], "Invalid PIN code");
    assert!(json["region"].is_null());
}

#[tokio::test]
async fn should_show_empty_cart_to_anonymous_visitor() {
    let response = app().oneshot(get("/cart")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["items"], serde_json::json!([]));
    assert_eq!(json["total"], "0.00");
}

#[tokio::test]
async fn should_reject_anonymous_and_forged_sessions() {
    let anonymous = app().oneshot(get("/orders")).await.unwrap();
    let forged = app()
        .oneshot(
            Request::builder()
                .uri("/orders")
                .header(header::COOKIE, "bazaar_session=not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_customer_on_admin_routes() {
    let customer = MockAuth::customer();
    let request = Request::builder()
        .uri("/admin/dashboard")
        .header(header::COOKIE, customer.cookie())
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = json_body(response).await;
    assert_eq!(json["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_reject_anonymous_admin_request() {
    let response = app().oneshot(get("/admin/orders")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_zero_quantity_add_to_cart() {
    let customer = MockAuth::customer();
    let body = serde_json::json!({ "product_id": Uuid::now_v7(), "quantity": 0 });
    let request = send_json("POST", "/cart/items", Some(&customer), body);

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_reject_pending_as_admin_status_target() {
    let admin = MockAuth::admin();
    let body = serde_json::json!({ "status": "Pending" });
    let uri = format!("/admin/orders/{}/status", Uuid::now_v7());
    let request = send_json("PATCH", &uri, Some(&admin), body);

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = json_body(response).await;
    assert_eq!(json["kind"], "INVALID_STATUS");
}

#[tokio::test]
async fn should_clear_session_cookie_on_logout() {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("bazaar_session="));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));
}
