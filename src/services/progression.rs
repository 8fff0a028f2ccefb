// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! XP, levels, streaks and badge unlocks.
//!
//! All functions here are pure state transitions on the profile/document;
//! persistence is the caller's job.

use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::{Badge, BadgeCategory, UserDocument, UserProfile};
use crate::time_utils::format_day;

/// Cumulative XP needed to reach level `i + 1`.
pub const LEVEL_THRESHOLDS: [u64; 6] = [0, 100, 250, 500, 1000, 2000];

/// XP per level for the linear curve.
pub const XP_PER_LEVEL: u64 = 100;

/// XP at which `financial` badges unlock.
pub const FINANCIAL_BADGE_XP: u64 = 50;

/// Streak length assumed for streak badges without an explicit threshold.
pub const DEFAULT_STREAK_REQUIREMENT: u32 = 7;

/// Mapping from cumulative XP to level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelCurve {
    /// Fixed table ([`LEVEL_THRESHOLDS`]), capped at the last entry
    #[default]
    Thresholds,
    /// `floor(xp / 100) + 1`, unbounded
    Linear,
}

impl FromStr for LevelCurve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thresholds" | "table" => Ok(LevelCurve::Thresholds),
            "linear" => Ok(LevelCurve::Linear),
            other => Err(format!("unknown level curve {other:?}")),
        }
    }
}

impl LevelCurve {
    pub fn level_for(self, xp: u64) -> u32 {
        match self {
            LevelCurve::Thresholds => LEVEL_THRESHOLDS
                .iter()
                .take_while(|&&threshold| xp >= threshold)
                .count()
                .max(1) as u32,
            LevelCurve::Linear => u32::try_from(xp / XP_PER_LEVEL + 1).unwrap_or(u32::MAX),
        }
    }

    /// XP still missing before the next level; 0 at the top of the table.
    pub fn xp_to_next_level(self, xp: u64) -> u64 {
        match self {
            LevelCurve::Thresholds => LEVEL_THRESHOLDS
                .iter()
                .find(|&&threshold| threshold > xp)
                .map(|threshold| threshold - xp)
                .unwrap_or(0),
            LevelCurve::Linear => (xp / XP_PER_LEVEL + 1) * XP_PER_LEVEL - xp,
        }
    }
}

/// Recompute `level` and `xp_to_next_level` from `xp`.
pub fn sync_level(profile: &mut UserProfile, curve: LevelCurve) {
    profile.level = curve.level_for(profile.xp);
    profile.xp_to_next_level = curve.xp_to_next_level(profile.xp);
}

/// Add XP and recompute the level. Returns the number of levels gained.
pub fn award_xp(profile: &mut UserProfile, amount: u64, curve: LevelCurve) -> u32 {
    let before = profile.level;
    profile.xp = profile.xp.saturating_add(amount);
    sync_level(profile, curve);
    profile.level.saturating_sub(before)
}

/// Remove XP (reward redemption only). Fails if the user cannot afford it.
pub fn spend_xp(profile: &mut UserProfile, amount: u64, curve: LevelCurve) -> Result<(), AppError> {
    if profile.xp < amount {
        return Err(AppError::BadRequest(format!(
            "Not enough XP: have {}, need {}",
            profile.xp, amount
        )));
    }
    profile.xp -= amount;
    sync_level(profile, curve);
    Ok(())
}

/// What happened to the streak when activity was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StreakChange {
    /// First recorded activity; streak went from 0 to 1
    Started,
    /// Already active today (or clock skew); nothing changed
    Unchanged,
    /// Consecutive day
    Extended,
    /// Gap of more than one day; streak restarted at 1
    Reset,
}

/// Record activity on `today` and update the streak.
///
/// The streak moves at most once per calendar day.
pub fn record_activity(profile: &mut UserProfile, today: NaiveDate) -> StreakChange {
    let change = match profile.last_active() {
        _ if profile.streak == 0 => {
            profile.streak = 1;
            StreakChange::Started
        }
        Some(last) if last >= today => StreakChange::Unchanged,
        Some(last) if today.signed_duration_since(last).num_days() == 1 => {
            profile.streak = profile.streak.saturating_add(1);
            StreakChange::Extended
        }
        _ => {
            profile.streak = 1;
            StreakChange::Reset
        }
    };

    if change != StreakChange::Unchanged {
        profile.last_active_date = format_day(today);
    }
    change
}

/// Whether the profile currently satisfies the badge's rule.
pub fn badge_earned(badge: &Badge, profile: &UserProfile) -> bool {
    match badge.category {
        BadgeCategory::Xp => profile.xp >= badge.required_xp,
        BadgeCategory::Streak => {
            profile.streak >= badge.required_streak.unwrap_or(DEFAULT_STREAK_REQUIREMENT)
        }
        // Simplified heuristics: task and financial badges track XP, not counts.
        BadgeCategory::Tasks => profile.xp >= badge.required_xp,
        BadgeCategory::Financial => profile.xp >= FINANCIAL_BADGE_XP,
    }
}

/// Unlock every badge whose rule is now met. Returns the newly unlocked IDs.
pub fn unlock_earned_badges(doc: &mut UserDocument) -> Vec<String> {
    let profile = &doc.user;
    doc.badges
        .iter_mut()
        .filter(|badge| !badge.unlocked && badge_earned(badge, profile))
        .map(|badge| {
            badge.unlocked = true;
            badge.id.clone()
        })
        .collect()
}

/// Set a badge's unlocked flag directly.
pub fn set_badge_unlocked(
    doc: &mut UserDocument,
    badge_id: &str,
    unlocked: bool,
) -> Result<Badge, AppError> {
    let badge = doc
        .badges
        .iter_mut()
        .find(|b| b.id == badge_id)
        .ok_or_else(|| AppError::NotFound(format!("Badge {} not found", badge_id)))?;
    badge.unlocked = unlocked;
    Ok(badge.clone())
}
