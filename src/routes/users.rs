// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User document routes: profile, settings, wallet, streak, badges, rewards.

use crate::error::{AppError, Result};
use crate::models::{Badge, FontSize, PetType, UserDocument, UserProfile};
use crate::routes::tasks::RESERVED_USER_IDS;
use crate::services::progression::{self, StreakChange};
use crate::services::wallet::{
    self, NewTransaction, PostedTransaction, Redemption, SavingsGoalPatch, SavingsGoalStatus,
};
use crate::time_utils::{format_day, parse_day, today_utc};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", post(create_user))
        .route(
            "/api/users/{user_id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/api/users/{user_id}/savings", patch(update_savings))
        .route("/api/users/{user_id}/transactions", post(add_transaction))
        .route("/api/users/{user_id}/streak", patch(update_streak))
        .route("/api/users/{user_id}/darkMode", patch(update_dark_mode))
        .route("/api/users/{user_id}/badges/{badge_id}", patch(unlock_badge))
        .route(
            "/api/users/{user_id}/rewards/{reward_id}/redeem",
            post(redeem_reward),
        )
}

/// Generic acknowledgement body.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ─── Create / Read / Delete ──────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    #[validate(length(min = 1, max = 128), custom(function = "validate_user_id"))]
    user_id: String,
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub message: String,
    pub user_id: String,
    pub user: UserProfile,
}

/// Create a user document from the default template.
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>)> {
    req.validate()?;

    let name = req.name.as_deref().unwrap_or("Quest Hero");
    let mut doc = UserDocument::new(&req.user_id, name, today_utc());
    progression::sync_level(&mut doc.user, state.config.level_curve);

    state.db.create_user_document(&doc).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".to_string(),
            user_id: req.user_id,
            user: doc.user,
        }),
    ))
}

/// Get the full user document.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDocument>> {
    let doc = state
        .db
        .get_user_document(&user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(&user_id))?;
    Ok(Json(doc))
}

/// Delete a user document and everything in it.
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.db.delete_user_document(&user_id).await? {
        return Err(AppError::user_not_found(&user_id));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "User deleted".to_string(),
    }))
}

// ─── Profile ─────────────────────────────────────────────────

/// Settings a client may change directly. Progression fields (xp, level,
/// streak) are not accepted here.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ProfilePatch {
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
    selected_pet: Option<PetType>,
    #[validate(length(max = 50))]
    pet_accessories: Option<Vec<String>>,
    dark_mode: Option<bool>,
    #[validate(custom(function = "validate_reminder_time"))]
    reminder_time: Option<String>,
    font_size: Option<FontSize>,
    /// Accepted for compatibility with clients that echo the whole profile;
    /// must match the path.
    id: Option<String>,
}

fn validate_user_id(value: &str) -> std::result::Result<(), ValidationError> {
    if RESERVED_USER_IDS.contains(&value) {
        return Err(ValidationError::new("reserved_user_id"));
    }
    Ok(())
}

fn validate_reminder_time(value: &str) -> std::result::Result<(), ValidationError> {
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::new("reminder_time_format"))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Update profile settings.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(changes): Json<ProfilePatch>,
) -> Result<Json<ProfileResponse>> {
    changes.validate()?;
    if changes.id.as_deref().is_some_and(|id| id != user_id) {
        return Err(AppError::BadRequest(
            "User ID in body does not match path".to_string(),
        ));
    }

    let user = state
        .db
        .update_user_document(&user_id, |doc| {
            let profile = &mut doc.user;
            if let Some(name) = changes.name {
                profile.name = name;
            }
            if let Some(pet) = changes.selected_pet {
                profile.selected_pet = pet;
            }
            if let Some(accessories) = changes.pet_accessories {
                profile.pet_accessories = accessories;
            }
            if let Some(dark_mode) = changes.dark_mode {
                profile.dark_mode = dark_mode;
            }
            if let Some(reminder_time) = changes.reminder_time {
                profile.reminder_time = reminder_time;
            }
            if let Some(font_size) = changes.font_size {
                profile.font_size = font_size;
            }
            Ok(profile.clone())
        })
        .await?;

    Ok(Json(ProfileResponse {
        message: "User updated".to_string(),
        user,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DarkModeRequest {
    dark_mode: Option<bool>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DarkModeResponse {
    pub dark_mode: bool,
}

/// Set dark mode, or toggle it when no value is given.
async fn update_dark_mode(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<DarkModeRequest>,
) -> Result<Json<DarkModeResponse>> {
    let dark_mode = state
        .db
        .update_user_document(&user_id, |doc| {
            doc.user.dark_mode = req.dark_mode.unwrap_or(!doc.user.dark_mode);
            Ok(doc.user.dark_mode)
        })
        .await?;

    Ok(Json(DarkModeResponse { dark_mode }))
}

// ─── Streak ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreakRequest {
    streak: Option<u32>,
    last_active_date: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct StreakResponse {
    pub streak: u32,
    pub last_active_date: String,
    /// Present when the streak rule was applied for today
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub change: Option<StreakChange>,
    pub unlocked_badges: Vec<String>,
}

/// Record activity for today, or overwrite the streak fields when given.
async fn update_streak(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<StreakRequest>,
) -> Result<Json<StreakResponse>> {
    let last_active = req
        .last_active_date
        .as_deref()
        .map(|raw| {
            parse_day(raw).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid lastActiveDate {:?}: expected YYYY-MM-DD or an RFC 3339 timestamp",
                    raw
                ))
            })
        })
        .transpose()?;
    let today = today_utc();

    let response = state
        .db
        .update_user_document(&user_id, |doc| {
            let change = if req.streak.is_none() && last_active.is_none() {
                Some(progression::record_activity(&mut doc.user, today))
            } else {
                if let Some(streak) = req.streak {
                    doc.user.streak = streak;
                }
                if let Some(day) = last_active {
                    doc.user.last_active_date = format_day(day);
                }
                None
            };
            let unlocked_badges = progression::unlock_earned_badges(doc);

            Ok(StreakResponse {
                streak: doc.user.streak,
                last_active_date: doc.user.last_active_date.clone(),
                change,
                unlocked_badges,
            })
        })
        .await?;

    tracing::debug!(
        user_id = %user_id,
        streak = response.streak,
        change = ?response.change,
        "Streak updated"
    );

    Ok(Json(response))
}

// ─── Badges ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct UnlockBadgeRequest {
    #[serde(default = "default_unlocked")]
    unlocked: bool,
}

fn default_unlocked() -> bool {
    true
}

/// Set a badge's unlocked flag.
async fn unlock_badge(
    State(state): State<Arc<AppState>>,
    Path((user_id, badge_id)): Path<(String, String)>,
    Json(req): Json<UnlockBadgeRequest>,
) -> Result<Json<Badge>> {
    let badge = state
        .db
        .update_user_document(&user_id, |doc| {
            progression::set_badge_unlocked(doc, &badge_id, req.unlocked)
        })
        .await?;

    tracing::info!(
        user_id = %user_id,
        badge_id = %badge.id,
        unlocked = badge.unlocked,
        "Badge updated"
    );

    Ok(Json(badge))
}

// ─── Wallet ──────────────────────────────────────────────────

/// Update the savings goal.
async fn update_savings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(changes): Json<SavingsGoalPatch>,
) -> Result<Json<SavingsGoalStatus>> {
    let status = state
        .db
        .update_user_document(&user_id, |doc| wallet::update_savings_goal(doc, changes))
        .await?;
    Ok(Json(status))
}

/// Record a transaction and adjust the cash or credit balance.
async fn add_transaction(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(new_tx): Json<NewTransaction>,
) -> Result<(StatusCode, Json<PostedTransaction>)> {
    let today = today_utc();
    let posted = state
        .db
        .update_user_document(&user_id, |doc| {
            wallet::post_transaction(doc, new_tx, today)
        })
        .await?;

    tracing::info!(
        user_id = %user_id,
        transaction_id = %posted.transaction.id,
        amount = posted.transaction.amount,
        kind = ?posted.transaction.kind,
        method = ?posted.transaction.method,
        "Transaction posted"
    );

    Ok((StatusCode::CREATED, Json(posted)))
}

/// Spend XP on a reward.
async fn redeem_reward(
    State(state): State<Arc<AppState>>,
    Path((user_id, reward_id)): Path<(String, String)>,
) -> Result<Json<Redemption>> {
    let curve = state.config.level_curve;
    let redemption = state
        .db
        .update_user_document(&user_id, |doc| {
            wallet::redeem_reward(doc, &reward_id, curve)
        })
        .await?;

    tracing::info!(
        user_id = %user_id,
        reward_id = %reward_id,
        new_xp = redemption.new_xp,
        "Reward redeemed"
    );

    Ok(Json(redemption))
}
