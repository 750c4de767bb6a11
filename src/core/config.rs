//! Runtime configuration loaded from the environment
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use anyhow::Result;
use std::env;

/// Default log filter when `LOG_LEVEL` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default binding file when `BINDINGS_PATH` is unset
pub const DEFAULT_BINDINGS_PATH: &str = "bindings.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub bindings_path: String,
}

impl Config {
    /// Read configuration from process environment variables
    ///
    /// Call `dotenvy::dotenv().ok()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let bindings_path =
            lookup("BINDINGS_PATH").unwrap_or_else(|| DEFAULT_BINDINGS_PATH.to_string());

        if bindings_path.trim().is_empty() {
            return Err(anyhow::anyhow!("BINDINGS_PATH must not be empty"));
        }

        Ok(Config {
            log_level,
            bindings_path,
        })
    }
}
