//! End-to-end scenarios for the intake API driven through the public router
//! and a store opened the same way the binary opens it.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use wellness_intake::config::StoreConfig;
use wellness_intake::intake::store::connect;
use wellness_intake::intake::{intake_router, IntakeService, LogNotifier, RecordStore};

fn memory_config() -> StoreConfig {
    StoreConfig {
        url: "memory://".to_string(),
        database_name: "wellness_test".to_string(),
        max_connections: 1,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn submissions_flow_from_create_to_listing_until_store_closes() {
    let store = Arc::new(connect(&memory_config()).await.expect("memory store opens"));
    assert_eq!(store.backend(), "memory");

    let service = Arc::new(IntakeService::new(store.clone(), Arc::new(LogNotifier)));
    let router = intake_router(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/contact",
            json!({
                "full_name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "555-1234",
                "health_concern": "low energy",
                "health_goals": "more energy",
            }),
        ))
        .await
        .expect("contact route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let contact = body_json(response).await;
    assert_eq!(contact["status"], "new");

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/consultation",
            json!({
                "name": "Sam Patel",
                "email": "sam@example.com",
                "phone": "555-9876",
                "message": "Evening slots preferred",
            }),
        ))
        .await
        .expect("consultation route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let consultation = body_json(response).await;
    assert_eq!(consultation["status"], "pending");

    let response = router
        .clone()
        .oneshot(get("/api/contact-forms"))
        .await
        .expect("list route executes");
    assert_eq!(body_json(response).await, json!([contact]));

    let response = router
        .clone()
        .oneshot(get("/api/consultations"))
        .await
        .expect("list route executes");
    assert_eq!(body_json(response).await, json!([consultation]));

    store.close().await;

    let response = router
        .clone()
        .oneshot(get("/api/consultations"))
        .await
        .expect("list route executes");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = router
        .oneshot(get("/api/health"))
        .await
        .expect("health route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}
