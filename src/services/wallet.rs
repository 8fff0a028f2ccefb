// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wallet bookkeeping: transactions, balances, savings goal, reward redemption.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    PaymentMethod, Reward, SavingsGoal, Transaction, TransactionKind, UserDocument,
};
use crate::services::progression::{self, LevelCurve};
use crate::time_utils::{format_day, parse_day};

/// Transaction as submitted by a client.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub category: String,
    /// Defaults to today
    pub date: Option<String>,
}

/// Result of posting a transaction.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PostedTransaction {
    pub transaction: Transaction,
    pub cash_balance: f64,
    pub credit_balance: f64,
}

/// Append a transaction and move the matching balance.
pub fn post_transaction(
    doc: &mut UserDocument,
    new_tx: NewTransaction,
    today: NaiveDate,
) -> Result<PostedTransaction, AppError> {
    new_tx.validate()?;
    // The range validator lets NaN and infinity through.
    if !new_tx.amount.is_finite() {
        return Err(AppError::BadRequest("Amount must be a finite number".to_string()));
    }

    let date = match new_tx.date {
        Some(raw) => format_day(parse_day(&raw).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid date {:?}: expected YYYY-MM-DD or an RFC 3339 timestamp",
                raw
            ))
        })?),
        None => format_day(today),
    };

    let id = new_tx
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    if doc.transactions.iter().any(|t| t.id == id) {
        return Err(AppError::Conflict(format!("Transaction {} already exists", id)));
    }

    let transaction = Transaction {
        id,
        name: new_tx.name,
        description: new_tx.description,
        amount: new_tx.amount,
        kind: new_tx.kind,
        method: new_tx.method,
        category: new_tx.category,
        date,
    };

    match transaction.method {
        PaymentMethod::Cash => doc.cash_balance += transaction.signed_amount(),
        PaymentMethod::Credit => doc.credit_balance += transaction.signed_amount(),
    }
    doc.transactions.push(transaction.clone());

    Ok(PostedTransaction {
        transaction,
        cash_balance: doc.cash_balance,
        credit_balance: doc.credit_balance,
    })
}

/// Partial update of the savings goal.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SavingsGoalPatch {
    #[validate(range(min = 0.0))]
    pub target: Option<f64>,
    pub current: Option<f64>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalStatus {
    pub savings_goal: SavingsGoal,
    pub goal_reached: bool,
}

pub fn update_savings_goal(
    doc: &mut UserDocument,
    patch: SavingsGoalPatch,
) -> Result<SavingsGoalStatus, AppError> {
    patch.validate()?;
    if patch
        .target
        .into_iter()
        .chain(patch.current)
        .any(|v| !v.is_finite())
    {
        return Err(AppError::BadRequest(
            "Savings amounts must be finite numbers".to_string(),
        ));
    }

    let goal = &mut doc.savings_goal;
    if let Some(target) = patch.target {
        goal.target = target;
    }
    if let Some(current) = patch.current {
        goal.current = current;
    }
    if let Some(title) = patch.title {
        goal.title = title;
    }

    Ok(SavingsGoalStatus {
        savings_goal: goal.clone(),
        goal_reached: goal.is_reached(),
    })
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub reward: Reward,
    #[serde(rename = "newXP")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub new_xp: u64,
    pub new_level: u32,
}

/// Spend XP on a reward. Each reward can be redeemed once.
pub fn redeem_reward(
    doc: &mut UserDocument,
    reward_id: &str,
    curve: LevelCurve,
) -> Result<Redemption, AppError> {
    let reward = doc
        .rewards
        .iter_mut()
        .find(|r| r.id == reward_id)
        .ok_or_else(|| AppError::NotFound(format!("Reward {} not found", reward_id)))?;

    if reward.redeemed {
        return Err(AppError::Conflict(format!(
            "Reward {} already redeemed",
            reward_id
        )));
    }

    progression::spend_xp(&mut doc.user, reward.cost, curve)?;
    reward.redeemed = true;

    Ok(Redemption {
        reward: reward.clone(),
        new_xp: doc.user.xp,
        new_level: doc.user.level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn new_doc() -> UserDocument {
        UserDocument::new("u1", "Quest Hero", today())
    }

    fn tx(kind: &str, method: &str, amount: f64) -> NewTransaction {
        serde_json::from_value(serde_json::json!({
            "name": "Groceries",
            "amount": amount,
            "type": kind,
            "method": method,
            "category": "food"
        }))
        .unwrap()
    }

    #[test]
    fn test_expense_against_cash() {
        let mut doc = new_doc();
        doc.cash_balance = 200.0;
        doc.credit_balance = 50.0;

        let posted = post_transaction(&mut doc, tx("expense", "cash", 75.5), today()).unwrap();

        assert_eq!(posted.cash_balance, 124.5);
        assert_eq!(posted.credit_balance, 50.0);
        assert_eq!(posted.transaction.date, "2024-06-01");
        assert_eq!(doc.transactions.len(), 1);
    }

    #[test]
    fn test_income_against_credit() {
        let mut doc = new_doc();
        let posted = post_transaction(&mut doc, tx("income", "credit", 300.0), today()).unwrap();
        assert_eq!(posted.credit_balance, 300.0);
        assert_eq!(posted.cash_balance, 0.0);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut doc = new_doc();
        for amount in [0.0, -5.0] {
            let err = post_transaction(&mut doc, tx("income", "cash", amount), today()).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "amount {amount}");
        }
        assert!(doc.transactions.is_empty());
    }

    #[test]
    fn test_timestamp_date_keeps_calendar_day() {
        let mut doc = new_doc();
        let mut income = tx("income", "cash", 42.0);
        income.date = Some("2024-03-15T09:30:00.000Z".to_string());

        let posted = post_transaction(&mut doc, income, today()).unwrap();
        assert_eq!(posted.transaction.date, "2024-03-15");
        assert_eq!(doc.transactions[0].date, "2024-03-15");
    }

    #[test]
    fn test_rejects_bad_date_and_duplicate_id() {
        let mut doc = new_doc();
        let mut bad_date = tx("income", "cash", 10.0);
        bad_date.date = Some("01/02/2024".to_string());
        assert!(matches!(
            post_transaction(&mut doc, bad_date, today()),
            Err(AppError::BadRequest(_))
        ));

        let mut first = tx("income", "cash", 10.0);
        first.id = Some("t1".to_string());
        post_transaction(&mut doc, first.clone(), today()).unwrap();
        assert!(matches!(
            post_transaction(&mut doc, first, today()),
            Err(AppError::Conflict(_))
        ));
        assert_eq!(doc.cash_balance, 10.0);
    }

    #[test]
    fn test_update_savings_goal_merges() {
        let mut doc = new_doc();
        let status = update_savings_goal(
            &mut doc,
            SavingsGoalPatch {
                current: Some(1200.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(status.goal_reached);
        assert_eq!(status.savings_goal.target, 1000.0);
        assert_eq!(status.savings_goal.title, "Emergency Fund");

        let err = update_savings_goal(
            &mut doc,
            SavingsGoalPatch {
                target: Some(-1.0),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_redeem_reward() {
        let mut doc = new_doc();
        doc.user.xp = 300;
        progression::sync_level(&mut doc.user, LevelCurve::Thresholds);

        let redemption = redeem_reward(&mut doc, "movie", LevelCurve::Thresholds).unwrap();
        assert_eq!(redemption.new_xp, 50);
        assert_eq!(redemption.new_level, 1);
        assert!(redemption.reward.redeemed);

        assert!(matches!(
            redeem_reward(&mut doc, "movie", LevelCurve::Thresholds),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            redeem_reward(&mut doc, "coffee", LevelCurve::Thresholds),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            redeem_reward(&mut doc, "yacht", LevelCurve::Thresholds),
            Err(AppError::NotFound(_))
        ));
    }
}
