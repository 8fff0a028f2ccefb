// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CoinQuest API Server
//!
//! Serves user documents (profile, quests, badges, wallet) and applies the
//! XP, level, streak and balance rules when quests are completed.

use coinquest::{
    config::{Config, StorageBackend},
    db::FirestoreDb,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        storage = ?config.storage_backend,
        level_curve = ?config.level_curve,
        "Starting CoinQuest API"
    );

    let db = match config.storage_backend {
        StorageBackend::Firestore => FirestoreDb::new(&config.gcp_project_id).await?,
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            FirestoreDb::new_in_memory()
        }
    };

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
    });

    // Build router
    let app = coinquest::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coinquest=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
