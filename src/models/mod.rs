// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod badge;
pub mod document;
pub mod task;
pub mod user;
pub mod wallet;

pub use badge::{Badge, BadgeCategory, Reward};
pub use document::UserDocument;
pub use task::{MicroTask, Priority, Task, TaskCategory};
pub use user::{FontSize, PetType, UserProfile};
pub use wallet::{PaymentMethod, SavingsGoal, Transaction, TransactionKind};
