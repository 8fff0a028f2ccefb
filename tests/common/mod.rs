// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use coinquest::config::Config;
use coinquest::db::FirestoreDb;
use coinquest::routes::create_router;
use coinquest::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[allow(dead_code)]
fn app_with_db(db: FirestoreDb) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db,
    });
    (create_router(state.clone()), state)
}

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    app_with_db(FirestoreDb::new_in_memory())
}

/// Create a test app whose store fails every call.
#[allow(dead_code)]
pub fn create_offline_app() -> (Router, Arc<AppState>) {
    app_with_db(FirestoreDb::new_mock())
}

/// Send a request and return the status and parsed JSON body
/// (`Value::Null` for an empty body).
#[allow(dead_code)]
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Create a user through the API and assert it succeeded.
#[allow(dead_code)]
pub async fn create_user(app: &Router, user_id: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/api/users",
        Some(serde_json::json!({ "userId": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}
