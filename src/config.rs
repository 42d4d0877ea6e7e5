//! Application configuration constants.
//!
//! This module centralizes the tunable values of the trainer: scheduler
//! defaults, list caps, session expiry and server settings.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                if let Some(path) = config.database.and_then(|db| db.path) {
                    tracing::info!("Using database from config.toml: {}", path);
                    return PathBuf::from(path);
                }
            }
            Err(e) => tracing::warn!("Ignoring malformed config.toml: {}", e),
        }
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from(paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port (override with PORT)
pub const SERVER_PORT: u16 = 3000;

/// Port from the PORT env var, falling back to [`SERVER_PORT`]
pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(SERVER_PORT)
}

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, server_port())
}

// ==================== Session Configuration ====================

/// Training sessions left untouched this long are dropped
pub const SESSION_EXPIRY_HOURS: i64 = 6;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== SM-2 Configuration ====================

/// Easiness factor assigned to a grid that has never been reviewed
pub const INITIAL_EASINESS_FACTOR: f64 = 2.5;

/// Easiness factor floor
pub const MIN_EASINESS_FACTOR: f64 = 1.3;

/// Lowest quality that counts as a successful recall
pub const PASSING_QUALITY: u8 = 3;

/// Longest review interval; keeps review dates inside the storable range
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// Accuracy thresholds (percent) for quality 5, 4, 3, 2, 1
pub const QUALITY_THRESHOLDS: [(f64, u8); 5] = [(95.0, 5), (85.0, 4), (70.0, 3), (50.0, 2), (30.0, 1)];

// ==================== Progress Limits ====================

/// Most recent sessions kept on a progress record
pub const SESSION_HISTORY_LIMIT: usize = 20;

/// Problem hands kept on a progress record
pub const PROBLEM_HANDS_LIMIT: usize = 10;

/// Default number of sessions returned by the session history endpoint
pub const RECENT_SESSIONS_LIMIT: u32 = 20;
