// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CoinQuest: gamified personal finance and task tracking
//!
//! This crate provides the backend API. Each user has a single document
//! holding their profile, quests, badges, rewards and wallet; completing
//! quests earns XP, levels, streaks and badges.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
}
