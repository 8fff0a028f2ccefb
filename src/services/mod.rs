// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.
//!
//! Services operate on an in-memory `UserDocument`; the routes load and
//! store it through `db::FirestoreDb::update_user_document`.

pub mod breakdown;
pub mod progression;
pub mod quests;
pub mod wallet;

pub use progression::LevelCurve;
