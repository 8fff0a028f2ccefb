// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::services::progression::LevelCurve;
use std::env;
use std::str::FromStr;

/// Where user documents are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Cloud Firestore (or the emulator when FIRESTORE_EMULATOR_HOST is set)
    Firestore,
    /// Process-local map; data is lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StorageBackend::Firestore),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    pub storage_backend: StorageBackend,
    /// XP to level mapping
    pub level_curve: LevelCurve,
}

impl Config {
    /// Config for tests: in-memory storage, threshold level curve.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:8080".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 5000,
            storage_backend: StorageBackend::Memory,
            level_curve: LevelCurve::Thresholds,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage_backend: env::var("STORAGE_BACKEND")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(StorageBackend::Firestore),
            level_curve: env::var("LEVEL_CURVE")
                .ok()
                .map(|v| {
                    v.parse()
                        .map_err(|_| ConfigError::Invalid("LEVEL_CURVE", v.clone()))
                })
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "9090");
        env::set_var("STORAGE_BACKEND", "memory");
        env::set_var("LEVEL_CURVE", "linear");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 9090);
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.level_curve, LevelCurve::Linear);

        env::set_var("LEVEL_CURVE", "exponential");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("LEVEL_CURVE", _))
        ));

        env::remove_var("PORT");
        env::remove_var("STORAGE_BACKEND");
        env::remove_var("LEVEL_CURVE");
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(
            "Firestore".parse::<StorageBackend>().unwrap(),
            StorageBackend::Firestore
        );
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
