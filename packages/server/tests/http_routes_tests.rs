//! HTTP surface: trigger authentication and the callable protocol.

mod common;

use std::sync::Arc;

use crate::common::{identity, payment_data, store_with_pending_order, store_with_user};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use functions_core::common::UserId;
use functions_core::domains::auth::JwtService;
use functions_core::domains::stats::STATS_COLLECTION;
use functions_core::domains::users::USERS_COLLECTION;
use functions_core::kernel::test_dependencies::InMemoryDocumentStore;
use functions_core::kernel::TestDependencies;
use functions_core::server::build_app;
use serde_json::{json, Value};
use tower::ServiceExt;

const TRIGGER_SECRET: &str = "trigger-secret";
const JWT_SECRET: &str = "jwt-secret";
const JWT_ISSUER: &str = "marketplace-functions";

fn app(test_deps: &TestDependencies) -> Router {
    build_app(
        test_deps.deps(),
        Arc::new(JwtService::new(JWT_SECRET, JWT_ISSUER.to_string())),
        TRIGGER_SECRET.to_string(),
        &["*".to_string()],
    )
}

fn token(uid: &str, admin: bool) -> String {
    JwtService::new(JWT_SECRET, JWT_ISSUER.to_string())
        .create_token(&UserId::new(uid), admin)
        .unwrap()
}

fn trigger(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-trigger-secret", TRIGGER_SECRET)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn callable(name: &str, bearer: Option<String>, data: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/callable/{}", name))
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(json!({ "data": data }).to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app(&TestDependencies::new())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn trigger_without_secret_is_unauthorized() {
    let test_deps = TestDependencies::new();
    let request = Request::builder()
        .method("POST")
        .uri("/triggers/identity-created")
        .header("content-type", "application/json")
        .body(Body::from(json!({"uid": "u1"}).to_string()))
        .unwrap();

    let response = app(&test_deps).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(test_deps.documents.operations().is_empty());
}

#[tokio::test]
async fn identity_created_trigger_provisions_user() {
    let test_deps = TestDependencies::new();
    let body = serde_json::to_value(identity("u1")).unwrap();

    let response = app(&test_deps)
        .oneshot(trigger("/triggers/identity-created", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(test_deps.documents.document(USERS_COLLECTION, "u1").is_some());
}

#[tokio::test]
async fn identity_created_failure_asks_for_redelivery() {
    let test_deps =
        TestDependencies::new().mock_documents(InMemoryDocumentStore::new().failing_writes());
    let body = serde_json::to_value(identity("u1")).unwrap();

    let response = app(&test_deps)
        .oneshot(trigger("/triggers/identity-created", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn order_created_trigger_is_acknowledged_even_when_invalid() {
    let test_deps = TestDependencies::new();

    let response = app(&test_deps)
        .oneshot(trigger("/triggers/order-created/o1", json!({"userId": "u1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(test_deps.notifications.sent().is_empty());
}

#[tokio::test]
async fn order_created_trigger_uses_path_id() {
    let test_deps = TestDependencies::new();
    let order = json!({
        "userId": "buyer",
        "items": [{"sellerId": "s1"}],
        "totalAmount": 5,
    });

    let response = app(&test_deps)
        .oneshot(trigger("/triggers/order-created/o42", order))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = test_deps.notifications.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "Order #o42 for 1 items");
}

#[tokio::test]
async fn daily_stats_trigger_writes_snapshot() {
    let test_deps = TestDependencies::new();

    let response = app(&test_deps)
        .oneshot(trigger("/triggers/daily-stats", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(test_deps.documents.documents(STATS_COLLECTION).len(), 1);
}

#[tokio::test]
async fn callable_without_token_is_unauthenticated() {
    let test_deps = TestDependencies::new().mock_documents(store_with_pending_order());

    let response = app(&test_deps)
        .oneshot(callable("processPayment", None, payment_data("o1", json!(50))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"]["status"], "UNAUTHENTICATED");
    assert_eq!(test_deps.payments.call_count(), 0);
}

#[tokio::test]
async fn callable_with_forged_token_is_unauthenticated() {
    let test_deps = TestDependencies::new().mock_documents(store_with_pending_order());
    let forged = JwtService::new("other-secret", JWT_ISSUER.to_string())
        .create_token(&UserId::new("u1"), true)
        .unwrap();

    let response = app(&test_deps)
        .oneshot(callable("processPayment", Some(forged), payment_data("o1", json!(50))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn process_payment_returns_result_envelope() {
    let test_deps = TestDependencies::new().mock_documents(store_with_pending_order());

    let response = app(&test_deps)
        .oneshot(callable(
            "processPayment",
            Some(token("u1", false)),
            payment_data("o1", json!(50)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"result": {"success": true, "transactionId": "tx_test_1"}})
    );
}

#[tokio::test]
async fn cleanup_by_non_admin_is_permission_denied() {
    let test_deps = TestDependencies::new().mock_documents(store_with_user("u1"));

    let response = app(&test_deps)
        .oneshot(callable(
            "cleanupUserData",
            Some(token("u2", false)),
            json!({"userId": "u1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"]["status"], "PERMISSION_DENIED");
    assert!(body["error"]["message"].is_string());
    assert!(test_deps.documents.document(USERS_COLLECTION, "u1").is_some());
}

#[tokio::test]
async fn cleanup_by_admin_succeeds() {
    let test_deps = TestDependencies::new().mock_documents(store_with_user("u1"));

    let response = app(&test_deps)
        .oneshot(callable(
            "cleanupUserData",
            Some(token("root", true)),
            json!({"userId": "u1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"result": {"success": true}}));
}

#[tokio::test]
async fn callable_validation_failure_is_internal() {
    let test_deps = TestDependencies::new().mock_documents(store_with_pending_order());

    let response = app(&test_deps)
        .oneshot(callable(
            "processPayment",
            Some(token("u1", false)),
            json!({"orderId": "o1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["status"], "INTERNAL");
}

#[tokio::test]
async fn malformed_envelope_is_invalid_argument() {
    let request = Request::builder()
        .method("POST")
        .uri("/callable/processPayment")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app(&TestDependencies::new()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["status"], "INVALID_ARGUMENT");
}
