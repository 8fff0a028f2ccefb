// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Automatic micro-task breakdown for financial tasks.
//!
//! Each pattern is a fixed list of steps with a difficulty. Micro-task XP is
//! `round(base / 4 * difficulty_weight * priority_multiplier)`, where `base`
//! depends on the pattern.

use serde::{Deserialize, Serialize};

use crate::models::{MicroTask, Priority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn weight(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 2.0,
            Difficulty::Hard => 3.0,
        }
    }
}

/// Unknown pattern names fall back to budgeting.
pub const FALLBACK_PATTERN: &str = "budgeting";

/// Base XP for patterns without an entry of their own.
const FALLBACK_BASE_XP: f64 = 100.0;

type Step = (&'static str, Difficulty);

const SAVINGS: &[Step] = &[
    ("Research savings options", Difficulty::Easy),
    ("Set up savings account", Difficulty::Medium),
    ("Create automatic transfer schedule", Difficulty::Medium),
    ("Monitor progress", Difficulty::Easy),
];

const INVESTMENT: &[Step] = &[
    ("Research investment options", Difficulty::Hard),
    ("Risk assessment", Difficulty::Medium),
    ("Create investment plan", Difficulty::Hard),
    ("Execute initial investment", Difficulty::Medium),
    ("Set up tracking system", Difficulty::Easy),
];

const BUDGETING: &[Step] = &[
    ("Track current expenses", Difficulty::Medium),
    ("Categorize spending", Difficulty::Easy),
    ("Set category limits", Difficulty::Medium),
    ("Create budget plan", Difficulty::Hard),
];

const DEBT: &[Step] = &[
    ("List all debts", Difficulty::Easy),
    ("Calculate interest rates", Difficulty::Medium),
    ("Create repayment strategy", Difficulty::Hard),
    ("Set up payment reminders", Difficulty::Easy),
];

fn pattern_steps(pattern: &str) -> &'static [Step] {
    match pattern {
        "savings" => SAVINGS,
        "investment" => INVESTMENT,
        "debt" => DEBT,
        _ => BUDGETING,
    }
}

fn base_xp(pattern: &str) -> f64 {
    match pattern {
        "savings" => 100.0,
        "investment" => 150.0,
        "budgeting" => 120.0,
        "debt" => 130.0,
        _ => FALLBACK_BASE_XP,
    }
}

fn priority_multiplier(priority: Priority) -> f64 {
    match priority {
        Priority::Low => 1.0,
        Priority::Medium => 1.5,
        Priority::High => 2.0,
    }
}

/// XP for one step.
pub fn micro_task_xp(difficulty: Difficulty, base_xp: f64, priority: Priority) -> u64 {
    (base_xp / 4.0 * difficulty.weight() * priority_multiplier(priority)).round() as u64
}

/// One generated step, before it is attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStep {
    pub title: String,
    pub difficulty: Difficulty,
    pub xp: u64,
}

/// Plan the steps for `task_title` using the named pattern.
pub fn plan(task_title: &str, pattern: &str, priority: Priority) -> Vec<PlannedStep> {
    let pattern = pattern.trim().to_ascii_lowercase();
    let base = base_xp(&pattern);

    pattern_steps(&pattern)
        .iter()
        .map(|&(title, difficulty)| PlannedStep {
            title: title.replace("current", task_title),
            difficulty,
            xp: micro_task_xp(difficulty, base, priority),
        })
        .collect()
}

/// Micro-tasks for a task, with IDs `<task_id>-<n>`.
pub fn generate_micro_tasks(
    task_id: &str,
    task_title: &str,
    pattern: &str,
    priority: Priority,
) -> Vec<MicroTask> {
    plan(task_title, pattern, priority)
        .into_iter()
        .enumerate()
        .map(|(i, step)| MicroTask {
            id: format!("{}-{}", task_id, i + 1),
            title: step.title,
            completed: false,
            xp: step.xp,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micro_task_xp_formula() {
        // investment base 150, hard, high: 150 / 4 * 3 * 2 = 225
        assert_eq!(micro_task_xp(Difficulty::Hard, 150.0, Priority::High), 225);
        // debt base 130, easy, medium: 32.5 * 1.5 = 48.75 -> 49
        assert_eq!(micro_task_xp(Difficulty::Easy, 130.0, Priority::Medium), 49);
    }

    #[test]
    fn test_plan_savings() {
        let steps = plan("Vacation", "savings", Priority::Low);
        let xp: Vec<u64> = steps.iter().map(|s| s.xp).collect();
        assert_eq!(xp, vec![25, 50, 50, 25]);
        assert_eq!(steps[1].title, "Set up savings account");
    }

    #[test]
    fn test_current_is_replaced_by_title() {
        let steps = plan("groceries", "budgeting", Priority::Low);
        assert_eq!(steps[0].title, "Track groceries expenses");
        // budgeting base 120, medium, low: 30 * 2 = 60
        assert_eq!(steps[0].xp, 60);
    }

    #[test]
    fn test_unknown_pattern_uses_budgeting_steps_with_fallback_base() {
        let steps = plan("Side hustle", "crypto", Priority::Low);
        assert_eq!(steps.len(), BUDGETING.len());
        // fallback base 100, medium, low: 25 * 2 = 50
        assert_eq!(steps[0].xp, 50);
    }

    #[test]
    fn test_generate_micro_tasks_ids() {
        let micro = generate_micro_tasks("t9", "Loans", "Debt", Priority::High);
        assert_eq!(micro.len(), 4);
        assert_eq!(micro[3].id, "t9-4");
        assert!(micro.iter().all(|m| !m.completed));
    }
}
