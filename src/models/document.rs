// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The per-user document.
//!
//! Everything a user owns lives in a single document keyed by user ID:
//! profile, tasks, badges, rewards, transactions, savings goal and balances.
//! All mutations are read-modify-write of the whole document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::badge::{default_badges, default_rewards};
use crate::models::{Badge, Reward, SavingsGoal, Task, Transaction, UserProfile};

/// Stored at: `users/{user_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub user: UserProfile,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub savings_goal: SavingsGoal,
    #[serde(default)]
    pub cash_balance: f64,
    #[serde(default)]
    pub credit_balance: f64,
}

impl UserDocument {
    /// Document for a brand new user, built from the default template.
    pub fn new(user_id: &str, name: &str, today: NaiveDate) -> Self {
        Self {
            user: UserProfile::new(user_id, name, today),
            tasks: Vec::new(),
            badges: default_badges(),
            rewards: default_rewards(),
            transactions: Vec::new(),
            savings_goal: SavingsGoal::default(),
            cash_balance: 0.0,
            credit_balance: 0.0,
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }
}
