// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement badges and XP-priced rewards.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Streak,
    Xp,
    Tasks,
    Financial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(rename = "requiredXP", default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub required_xp: u64,
    /// Streak length needed for `Streak` badges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_streak: Option<u32>,
    pub category: BadgeCategory,
}

/// Something the user can buy with XP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub name: String,
    /// XP cost
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub cost: u64,
    #[serde(default)]
    pub redeemed: bool,
}

fn badge(
    id: &str,
    title: &str,
    description: &str,
    icon: &str,
    required_xp: u64,
    required_streak: Option<u32>,
    category: BadgeCategory,
) -> Badge {
    Badge {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        unlocked: false,
        required_xp,
        required_streak,
        category,
    }
}

/// Badge set every new user starts with.
pub fn default_badges() -> Vec<Badge> {
    use BadgeCategory::*;
    vec![
        badge("1", "First Steps", "Complete your first task", "🌟", 10, None, Tasks),
        badge("2", "Streak Starter", "Maintain a 3-day streak", "🔥", 0, Some(3), Streak),
        badge("3", "XP Collector", "Earn 100 XP", "💎", 100, None, Xp),
        badge("4", "Financial Wizard", "Complete 5 financial tasks", "🧙‍♂️", 0, None, Financial),
        badge("5", "Level Up!", "Reach level 2", "⭐", 100, None, Xp),
        badge("6", "Consistency King", "Maintain a 7-day streak", "👑", 0, Some(7), Streak),
    ]
}

/// Rewards every new user starts with.
pub fn default_rewards() -> Vec<Reward> {
    vec![
        Reward {
            id: "coffee".to_string(),
            name: "Free Coffee".to_string(),
            cost: 100,
            redeemed: false,
        },
        Reward {
            id: "movie".to_string(),
            name: "Movie Night".to_string(),
            cost: 250,
            redeemed: false,
        },
    ]
}
