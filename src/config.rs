//! Runtime configuration
//!
//! Read once at startup from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DATABASE_PATH_VAR: &str = "NUTRILENS_DATABASE_PATH";
pub const ANALYSIS_URL_VAR: &str = "NUTRILENS_ANALYSIS_URL";
pub const ANALYSIS_TIMEOUT_VAR: &str = "NUTRILENS_ANALYSIS_TIMEOUT_SECS";

const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    /// Base URL of the food analysis backend, if any
    pub analysis_url: Option<String>,
    pub analysis_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_path = non_empty(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let analysis_url = non_empty(ANALYSIS_URL_VAR).map(|v| v.trim().to_string());

        let timeout_secs = non_empty(ANALYSIS_TIMEOUT_VAR)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_ANALYSIS_TIMEOUT_SECS);

        Self {
            database_path,
            analysis_url,
            analysis_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// `<project>/data/nutrilens.db`, where the project root is found by walking
/// up from `target/{debug,release}` next to the executable
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(|p| p.parent()) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutrilens.db");
    path
}
