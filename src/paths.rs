//! Project path functions - single source of truth for file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//! - `PORT`: Override the server port (see config.rs)
//!
//! This allows running multiple isolated instances side by side:
//! ```bash
//! DATA_DIR=data/test PORT=3001 cargo run
//! ```

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// SQLite database holding grids, progress and session logs
pub fn db_path() -> String {
    format!("{}/trainer.db", data_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_path_is_under_data_dir() {
        let path = db_path();
        assert!(path.starts_with(data_dir()));
        assert!(path.ends_with("/trainer.db"));
    }
}
