//! Integration tests for the health/info endpoint.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use rollcall_testing::TestEnv;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_returns_status_payload() {
    let env = TestEnv::new().await;
    let app = env.router();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["message"], "育名補習班簽到系統運行中");
    assert_eq!(json["endpoints"], serde_json::json!(["/api/attend", "/api/webhook"]));
    // The injected clock pins the reported timestamp.
    assert_eq!(json["timestamp"], "2026-03-05T02:30:00.000Z");
}

#[tokio::test]
async fn api_index_serves_the_same_payload() {
    let env = TestEnv::new().await;
    let app = env.router();

    let response = app
        .oneshot(Request::builder().uri("/api/index").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn any_method_is_tolerated() {
    let env = TestEnv::new().await;

    for method in ["GET", "POST", "PUT", "DELETE"] {
        let response = env
            .router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/index")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "method {method}");
    }
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let env = TestEnv::new().await;

    let response = env
        .router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("X-Request-Id"));
}
