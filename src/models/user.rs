// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model: progression counters plus personal settings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Format used for `lastActiveDate` and task due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Virtual pet the user has chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum PetType {
    #[default]
    Cat,
    Plant,
    Dragon,
}

/// UI font size preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    #[default]
    Normal,
    Large,
}

/// The `user` section of a user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID (also used as document ID)
    pub id: String,
    /// Display name
    pub name: String,
    pub level: u32,
    /// Cumulative XP
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub xp: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub xp_to_next_level: u64,
    /// Consecutive active days
    pub streak: u32,
    /// Last day with recorded activity (YYYY-MM-DD)
    pub last_active_date: String,
    #[serde(default)]
    pub selected_pet: PetType,
    #[serde(default)]
    pub pet_accessories: Vec<String>,
    #[serde(default)]
    pub dark_mode: bool,
    /// Daily reminder time (HH:MM)
    #[serde(default = "default_reminder_time")]
    pub reminder_time: String,
    #[serde(default)]
    pub font_size: FontSize,
}

fn default_reminder_time() -> String {
    "09:00".to_string()
}

impl UserProfile {
    /// Fresh level-1 profile, active as of `today`.
    pub fn new(id: &str, name: &str, today: NaiveDate) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            level: 1,
            xp: 0,
            xp_to_next_level: 100,
            streak: 0,
            last_active_date: crate::time_utils::format_day(today),
            selected_pet: PetType::default(),
            pet_accessories: Vec::new(),
            dark_mode: false,
            reminder_time: default_reminder_time(),
            font_size: FontSize::default(),
        }
    }

    /// Parsed `last_active_date`, or `None` if the stored value is malformed.
    pub fn last_active(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.last_active_date, DATE_FORMAT).ok()
    }
}
