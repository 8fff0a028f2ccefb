// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task and micro-task lifecycle: adding tasks and completing them for XP.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;
use crate::models::{MicroTask, Priority, Task, TaskCategory, UserDocument};
use crate::services::breakdown;
use crate::services::progression::{self, LevelCurve};

/// Outcome of completing a task or micro-task.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub message: String,
    #[serde(rename = "xpGained")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub xp_gained: u64,
    #[serde(rename = "newXP")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub new_xp: u64,
    pub new_level: u32,
    pub new_streak: u32,
    pub leveled_up: bool,
    /// Badges unlocked by this completion
    pub unlocked_badges: Vec<String>,
}

impl CompletionOutcome {
    fn unchanged(doc: &UserDocument, message: &str) -> Self {
        Self {
            message: message.to_string(),
            xp_gained: 0,
            new_xp: doc.user.xp,
            new_level: doc.user.level,
            new_streak: doc.user.streak,
            leveled_up: false,
            unlocked_badges: Vec::new(),
        }
    }
}

/// Task as submitted by a client. IDs are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<String>,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub micro_tasks: Vec<NewMicroTask>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMicroTask {
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub xp: u64,
}

/// Append a task to the document.
///
/// With `breakdown_pattern` set and no micro-tasks supplied, micro-tasks are
/// generated from that pattern.
pub fn add_task(
    doc: &mut UserDocument,
    new_task: NewTask,
    breakdown_pattern: Option<&str>,
) -> Result<Task, AppError> {
    if new_task.title.trim().is_empty() {
        return Err(AppError::BadRequest("Task title must not be empty".to_string()));
    }
    if let Some(due) = &new_task.due_date {
        NaiveDate::parse_from_str(due, crate::models::user::DATE_FORMAT).map_err(|_| {
            AppError::BadRequest(format!("Invalid dueDate {:?}: expected YYYY-MM-DD", due))
        })?;
    }

    let id = new_task
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    if doc.task(&id).is_some() {
        return Err(AppError::Conflict(format!("Task {} already exists", id)));
    }

    let micro_tasks = match breakdown_pattern {
        Some(pattern) if new_task.micro_tasks.is_empty() => breakdown::generate_micro_tasks(
            &id,
            &new_task.title,
            pattern,
            new_task.priority,
        ),
        _ => new_task
            .micro_tasks
            .into_iter()
            .enumerate()
            .map(|(i, micro)| MicroTask {
                id: micro.id.unwrap_or_else(|| format!("{}-{}", id, i + 1)),
                title: micro.title,
                completed: false,
                xp: micro.xp,
            })
            .collect(),
    };

    let task = Task {
        id,
        title: new_task.title,
        description: new_task.description,
        xp: new_task.xp,
        completed: false,
        priority: new_task.priority,
        due_date: new_task.due_date,
        category: new_task.category,
        micro_tasks,
    };
    doc.tasks.push(task.clone());
    Ok(task)
}

/// Complete a task and every micro-task under it.
///
/// The reward is the task's XP plus the XP of micro-tasks that were still
/// open; micro-tasks completed earlier already paid out.
pub fn complete_task(
    doc: &mut UserDocument,
    task_id: &str,
    today: NaiveDate,
    curve: LevelCurve,
) -> Result<CompletionOutcome, AppError> {
    let task = doc
        .task_mut(task_id)
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;

    if task.completed {
        return Ok(CompletionOutcome::unchanged(doc, "Task already completed"));
    }

    let xp_gained = task.xp.saturating_add(task.pending_micro_xp());
    task.completed = true;
    for micro in &mut task.micro_tasks {
        micro.completed = true;
    }

    let levels = progression::award_xp(&mut doc.user, xp_gained, curve);
    let streak = progression::record_activity(&mut doc.user, today);
    let unlocked_badges = progression::unlock_earned_badges(doc);

    tracing::debug!(
        user_id = %doc.user.id,
        task_id,
        xp_gained,
        streak = ?streak,
        "Task completed"
    );

    Ok(CompletionOutcome {
        message: "Task and micro-tasks completed".to_string(),
        xp_gained,
        new_xp: doc.user.xp,
        new_level: doc.user.level,
        new_streak: doc.user.streak,
        leveled_up: levels > 0,
        unlocked_badges,
    })
}

/// Complete a single micro-task. The parent task is left open.
pub fn complete_micro_task(
    doc: &mut UserDocument,
    task_id: &str,
    micro_task_id: &str,
    curve: LevelCurve,
) -> Result<CompletionOutcome, AppError> {
    let task = doc
        .task_mut(task_id)
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;
    let micro = task.micro_task_mut(micro_task_id).ok_or_else(|| {
        AppError::NotFound(format!(
            "Micro-task {} not found in task {}",
            micro_task_id, task_id
        ))
    })?;

    if micro.completed {
        return Ok(CompletionOutcome::unchanged(
            doc,
            "Micro-task already completed",
        ));
    }

    micro.completed = true;
    let xp_gained = micro.xp;

    let levels = progression::award_xp(&mut doc.user, xp_gained, curve);
    let unlocked_badges = progression::unlock_earned_badges(doc);

    Ok(CompletionOutcome {
        message: "Micro-task completed".to_string(),
        xp_gained,
        new_xp: doc.user.xp,
        new_level: doc.user.level,
        new_streak: doc.user.streak,
        leveled_up: levels > 0,
        unlocked_badges,
    })
}
