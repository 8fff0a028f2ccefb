// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task ("quest") routes.
//!
//! Completion endpoints accept both PATCH and POST; older clients use POST.

use crate::error::Result;
use crate::models::{Priority, Task};
use crate::services::breakdown::{self, PlannedStep};
use crate::services::quests::{self, CompletionOutcome, NewTask};
use crate::time_utils::today_utc;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Static segments under `/api/tasks/` that would shadow a user's task list.
pub const RESERVED_USER_IDS: [&str; 3] = ["breakdown", "complete", "completeMicroTask"];

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tasks", post(add_task))
        .route("/api/tasks/breakdown", post(preview_breakdown))
        .route("/api/tasks/complete", post(complete_task).patch(complete_task))
        .route(
            "/api/tasks/completeMicroTask",
            post(complete_micro_task).patch(complete_micro_task),
        )
        .route("/api/tasks/{user_id}", get(list_tasks))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// List a user's tasks in stored order.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<TasksResponse>> {
    let doc = state
        .db
        .get_user_document(&user_id)
        .await?
        .ok_or_else(|| crate::error::AppError::user_not_found(&user_id))?;

    Ok(Json(TasksResponse { tasks: doc.tasks }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddTaskRequest {
    user_id: String,
    task: NewTask,
    /// Generate micro-tasks from this pattern when none are given
    breakdown: Option<String>,
}

/// Add a task to a user's list.
async fn add_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddTaskRequest>,
) -> Result<(StatusCode, Json<Task>)> {
    let breakdown = req.breakdown;
    let task = state
        .db
        .update_user_document(&req.user_id, |doc| {
            quests::add_task(doc, req.task, breakdown.as_deref())
        })
        .await?;

    tracing::info!(
        user_id = %req.user_id,
        task_id = %task.id,
        micro_tasks = task.micro_tasks.len(),
        "Task added"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Deserialize)]
struct BreakdownRequest {
    title: String,
    #[serde(default = "default_pattern")]
    pattern: String,
    #[serde(default)]
    priority: Priority,
}

fn default_pattern() -> String {
    breakdown::FALLBACK_PATTERN.to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownResponse {
    pub micro_tasks: Vec<PlannedStep>,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
}

/// Preview the micro-tasks a pattern would generate, without storing anything.
async fn preview_breakdown(Json(req): Json<BreakdownRequest>) -> Json<BreakdownResponse> {
    let micro_tasks = breakdown::plan(&req.title, &req.pattern, req.priority);
    let total_xp = micro_tasks.iter().map(|step| step.xp).sum();
    Json(BreakdownResponse {
        micro_tasks,
        total_xp,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteTaskRequest {
    user_id: String,
    task_id: String,
}

/// Complete a task and its micro-tasks.
async fn complete_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompleteTaskRequest>,
) -> Result<Json<CompletionOutcome>> {
    let today = today_utc();
    let curve = state.config.level_curve;

    let outcome = state
        .db
        .update_user_document(&req.user_id, |doc| {
            quests::complete_task(doc, &req.task_id, today, curve)
        })
        .await?;

    tracing::info!(
        user_id = %req.user_id,
        task_id = %req.task_id,
        xp_gained = outcome.xp_gained,
        new_level = outcome.new_level,
        new_streak = outcome.new_streak,
        "Task completion processed"
    );

    Ok(Json(outcome))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteMicroTaskRequest {
    user_id: String,
    task_id: String,
    micro_task_id: String,
}

/// Complete one micro-task.
async fn complete_micro_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompleteMicroTaskRequest>,
) -> Result<Json<CompletionOutcome>> {
    let curve = state.config.level_curve;

    let outcome = state
        .db
        .update_user_document(&req.user_id, |doc| {
            quests::complete_micro_task(doc, &req.task_id, &req.micro_task_id, curve)
        })
        .await?;

    tracing::info!(
        user_id = %req.user_id,
        task_id = %req.task_id,
        micro_task_id = %req.micro_task_id,
        xp_gained = outcome.xp_gained,
        "Micro-task completion processed"
    );

    Ok(Json(outcome))
}
