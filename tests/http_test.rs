mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::*;
use paypal_sync::AppState;
use paypal_sync::adapters::http::router;
use paypal_sync::domain::provider::OrderStatus;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(processor: &Arc<FakeProcessor>) -> axum::Router {
    let state = AppState {
        sessions: service(processor),
    };
    router(state, Duration::from_secs(5))
}

async fn post_json(app: axum::Router, path: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_check_responds_ok() {
    let processor = FakeProcessor::new(OrderStatus::Created);
    let response = app(&processor)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn initiate_returns_pending_session() {
    let processor = FakeProcessor::new(OrderStatus::Created);

    let (status, body) = post_json(
        app(&processor),
        "/payment-sessions/initiate",
        json!({
            "amount": 2500,
            "currency_code": "eur",
            "context": {"return_url": "https://x/return"},
            "idempotency_key": "cart_01HZX",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["data"]["order_id"], ORDER_ID);
    assert_eq!(body["data"]["approve_url"], APPROVE_URL);
    assert_eq!(body["data"]["currency_code"], "EUR");
}

#[tokio::test]
async fn initiate_without_return_url_is_unprocessable() {
    let processor = FakeProcessor::new(OrderStatus::Created);

    let (status, body) = post_json(
        app(&processor),
        "/payment-sessions/initiate",
        json!({"amount": 2500, "currency_code": "EUR", "context": {}}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "invalid_configuration");
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn provider_failure_is_reported_without_raw_body() {
    let processor = FakeProcessor::new(OrderStatus::Approved);
    processor.fail_next(500, r#"{"name":"INTERNAL_SERVICE_ERROR","debug_id":"90957fca61718"}"#);

    let (status, body) = post_json(
        app(&processor),
        "/payment-sessions/authorize",
        json!({"data": {"order_id": ORDER_ID, "currency_code": "EUR", "status": "pending"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error_code"], "payment_failed");
    assert_eq!(body["message"], "payment could not be completed");
    assert_eq!(body["retryable"], true);
    assert!(!body.to_string().contains("debug_id"));
}

#[tokio::test]
async fn authorize_round_trips_session_data() {
    let processor = FakeProcessor::new(OrderStatus::Approved);

    let (status, body) = post_json(
        app(&processor),
        "/payment-sessions/authorize",
        json!({
            "data": {
                "order_id": ORDER_ID,
                "currency_code": "EUR",
                "status": "pending",
                "cart_id": "cart_01HZX",
            },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "captured");
    assert_eq!(body["data"]["capture_id"], CAPTURE_ID);
    assert_eq!(body["data"]["cart_id"], "cart_01HZX");
}

#[tokio::test]
async fn refund_without_capture_is_unprocessable() {
    let processor = FakeProcessor::new(OrderStatus::Completed);

    let (status, body) = post_json(
        app(&processor),
        "/payment-sessions/refund",
        json!({"data": {"order_id": ORDER_ID, "currency_code": "EUR"}, "amount": 500}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "invalid_configuration");
}

#[tokio::test]
async fn status_endpoint_reports_mapped_status() {
    let processor = FakeProcessor::new(OrderStatus::Voided);

    let (status, body) = post_json(
        app(&processor),
        "/payment-sessions/status",
        json!({"data": {"order_id": ORDER_ID}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "canceled"}));
}

#[tokio::test]
async fn webhook_reports_not_supported() {
    let processor = FakeProcessor::new(OrderStatus::Created);

    let (status, body) = post_json(
        app(&processor),
        "/webhook",
        json!({"event_type": "PAYMENT.CAPTURE.COMPLETED"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"action": "not_supported"}));
}
