// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wallet models: transactions and the savings goal.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Direction of a transaction.
///
/// `earning`/`spending` are the spellings used by older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(alias = "earning")]
    Income,
    #[serde(alias = "spending")]
    Expense,
}

/// Which balance a transaction moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Credit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub category: String,
    /// Transaction date (YYYY-MM-DD)
    pub date: String,
}

impl Transaction {
    /// Effect on the named balance: positive for income, negative for expense.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SavingsGoal {
    pub target: f64,
    pub current: f64,
    pub title: String,
}

impl Default for SavingsGoal {
    fn default() -> Self {
        Self {
            target: 1000.0,
            current: 0.0,
            title: "Emergency Fund".to_string(),
        }
    }
}

impl SavingsGoal {
    pub fn is_reached(&self) -> bool {
        self.target > 0.0 && self.current >= self.target
    }
}
