// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quest API tests: adding, completing and breaking down tasks.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;
use common::{create_user, send};

fn budget_task() -> Value {
    json!({
        "userId": "1",
        "task": {
            "id": "budget",
            "title": "Set up monthly budget",
            "xp": 50,
            "priority": "high",
            "category": "financial",
            "microTasks": [
                { "title": "List all income sources", "xp": 10 },
                { "title": "Track fixed expenses", "xp": 15 },
                { "title": "Identify variable expenses", "xp": 15 },
                { "title": "Set spending limits", "xp": 10 }
            ]
        }
    })
}

#[tokio::test]
async fn test_add_and_list_tasks() {
    let (app, _) = common::create_test_app();
    create_user(&app, "1").await;

    let (status, task) = send(&app, "POST", "/api/tasks", Some(budget_task())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["id"], "budget");
    assert_eq!(task["completed"], false);
    assert_eq!(task["microTasks"][1]["id"], "budget-2");

    let (status, body) = send(&app, "GET", "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Set up monthly budget");

    let (status, _) = send(&app, "POST", "/api/tasks", Some(budget_task())).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_tasks_for_unknown_user() {
    let (app, _) = common::create_test_app();
    let (status, _) = send(&app, "GET", "/api/tasks/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_complete_task_awards_xp_once() {
    let (app, _) = common::create_test_app();
    create_user(&app, "1").await;
    send(&app, "POST", "/api/tasks", Some(budget_task())).await;

    let (status, outcome) = send(
        &app,
        "POST",
        "/api/tasks/complete",
        Some(json!({ "userId": "1", "taskId": "budget" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["xpGained"], 100);
    assert_eq!(outcome["newXP"], 100);
    assert_eq!(outcome["newLevel"], 2);
    assert_eq!(outcome["newStreak"], 1);
    assert_eq!(outcome["leveledUp"], true);
    assert_eq!(outcome["unlockedBadges"], json!(["1", "3", "4", "5"]));

    let (status, again) = send(
        &app,
        "PATCH",
        "/api/tasks/complete",
        Some(json!({ "userId": "1", "taskId": "budget" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["xpGained"], 0);
    assert_eq!(again["newXP"], 100);

    let (_, doc) = send(&app, "GET", "/api/users/1", None).await;
    assert_eq!(doc["user"]["xp"], 100);
    assert_eq!(doc["user"]["xpToNextLevel"], 150);
    let task = &doc["tasks"][0];
    assert_eq!(task["completed"], true);
    assert!(task["microTasks"]
        .as_array()
        .unwrap()
        .iter()
        .all(|m| m["completed"] == true));
}

#[tokio::test]
async fn test_micro_task_then_task() {
    let (app, _) = common::create_test_app();
    create_user(&app, "1").await;
    send(&app, "POST", "/api/tasks", Some(budget_task())).await;

    let (status, outcome) = send(
        &app,
        "PATCH",
        "/api/tasks/completeMicroTask",
        Some(json!({ "userId": "1", "taskId": "budget", "microTaskId": "budget-2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["xpGained"], 15);
    assert_eq!(outcome["newStreak"], 0);

    // The parent stays open.
    let (_, body) = send(&app, "GET", "/api/tasks/1", None).await;
    assert_eq!(body["tasks"][0]["completed"], false);
    assert_eq!(body["tasks"][0]["microTasks"][1]["completed"], true);

    let (_, repeat) = send(
        &app,
        "POST",
        "/api/tasks/completeMicroTask",
        Some(json!({ "userId": "1", "taskId": "budget", "microTaskId": "budget-2" })),
    )
    .await;
    assert_eq!(repeat["xpGained"], 0);

    let (_, outcome) = send(
        &app,
        "POST",
        "/api/tasks/complete",
        Some(json!({ "userId": "1", "taskId": "budget" })),
    )
    .await;
    assert_eq!(outcome["xpGained"], 85);
    assert_eq!(outcome["newXP"], 100);
}

#[tokio::test]
async fn test_complete_unknown_task_or_micro_task() {
    let (app, _) = common::create_test_app();
    create_user(&app, "1").await;
    send(&app, "POST", "/api/tasks", Some(budget_task())).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/tasks/complete",
        Some(json!({ "userId": "1", "taskId": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/tasks/completeMicroTask",
        Some(json!({ "userId": "1", "taskId": "budget", "microTaskId": "budget-9" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/tasks/complete",
        Some(json!({ "userId": "ghost", "taskId": "budget" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, doc) = send(&app, "GET", "/api/users/1", None).await;
    assert_eq!(doc["user"]["xp"], 0);
}

#[tokio::test]
async fn test_add_task_with_generated_breakdown() {
    let (app, _) = common::create_test_app();
    create_user(&app, "1").await;

    let (status, task) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({
            "userId": "1",
            "task": { "id": "nest", "title": "Build a nest egg", "priority": "low" },
            "breakdown": "savings"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let micro_tasks = task["microTasks"].as_array().unwrap();
    assert_eq!(micro_tasks.len(), 4);
    assert_eq!(micro_tasks[0]["id"], "nest-1");
    let xp: Vec<u64> = micro_tasks.iter().map(|m| m["xp"].as_u64().unwrap()).collect();
    assert_eq!(xp, vec![25, 50, 50, 25]);
}

#[tokio::test]
async fn test_breakdown_preview() {
    let (app, _) = common::create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks/breakdown",
        Some(json!({ "title": "Pay off card", "pattern": "debt", "priority": "medium" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let steps = body["microTasks"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0]["title"], "List all debts");
    assert_eq!(steps[0]["difficulty"], "easy");
    let sum: u64 = steps.iter().map(|s| s["xp"].as_u64().unwrap()).sum();
    assert_eq!(body["totalXP"], sum);
}

#[tokio::test]
async fn test_add_task_rejects_bad_input() {
    let (app, _) = common::create_test_app();
    create_user(&app, "1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({ "userId": "1", "task": { "title": " " } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({ "userId": "1", "task": { "title": "Save", "dueDate": "soon" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({ "userId": "1", "task": { "title": "Save", "priority": "urgent" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
