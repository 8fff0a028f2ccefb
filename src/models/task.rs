// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task ("quest") and micro-task models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Task category.
///
/// Older clients send finer-grained financial categories; those all map
/// onto `Financial`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    #[serde(
        alias = "savings",
        alias = "investment",
        alias = "budgeting",
        alias = "debt",
        alias = "income"
    )]
    Financial,
    #[default]
    #[serde(alias = "custom")]
    Personal,
    Work,
    Health,
}

/// A single step of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MicroTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub xp: u64,
}

/// A task stored in the user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// XP awarded for completing the task itself
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub xp: u64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Due date (YYYY-MM-DD)
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub micro_tasks: Vec<MicroTask>,
}

impl Task {
    pub fn micro_task_mut(&mut self, micro_task_id: &str) -> Option<&mut MicroTask> {
        self.micro_tasks.iter_mut().find(|m| m.id == micro_task_id)
    }

    /// XP still available from micro-tasks that are not yet completed.
    pub fn pending_micro_xp(&self) -> u64 {
        self.micro_tasks
            .iter()
            .filter(|m| !m.completed)
            .map(|m| m.xp)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_categories_map_to_financial() {
        for raw in ["financial", "savings", "investment", "budgeting", "debt"] {
            let category: TaskCategory =
                serde_json::from_value(serde_json::Value::String(raw.to_string())).unwrap();
            assert_eq!(category, TaskCategory::Financial, "category {raw}");
        }
    }

    #[test]
    fn test_pending_micro_xp_skips_completed() {
        let mut task: Task = serde_json::from_value(serde_json::json!({
            "id": "1",
            "title": "Set up monthly budget",
            "xp": 50,
            "microTasks": [
                { "id": "1-1", "title": "List all income sources", "completed": true, "xp": 10 },
                { "id": "1-2", "title": "Track fixed expenses", "xp": 15 }
            ]
        }))
        .unwrap();

        assert_eq!(task.pending_micro_xp(), 15);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.micro_task_mut("9-9").is_none());
        task.micro_task_mut("1-2").unwrap().completed = true;
        assert_eq!(task.pending_micro_xp(), 0);
    }
}
