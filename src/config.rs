//! Runtime configuration
//!
//! Everything is read from environment variables with local defaults.

use std::path::PathBuf;

use crate::catalog::DEFAULT_FDC_BASE_URL;

/// Key FoodData Central accepts for low-volume anonymous use
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Where diary, measurement, and profile data live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// SQLite file that survives restarts
    Sqlite,
    /// Session-only memory store
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
        }
    }

    /// Parse a backend name, None if unrecognized
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "db" | "database" => Some(StorageBackend::Sqlite),
            "memory" | "session" => Some(StorageBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub storage: StorageBackend,
    pub usda_api_key: String,
    pub fdc_base_url: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_path = lookup("NUTRITRACK_DATABASE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let storage = match lookup("NUTRITRACK_STORAGE") {
            Some(value) => StorageBackend::parse(&value).unwrap_or_else(|| {
                tracing::warn!("Unknown NUTRITRACK_STORAGE '{}', using sqlite", value);
                StorageBackend::Sqlite
            }),
            None => StorageBackend::Sqlite,
        };

        let usda_api_key = lookup("USDA_API_KEY")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEMO_API_KEY.to_string());

        let fdc_base_url = lookup("NUTRITRACK_FDC_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FDC_BASE_URL.to_string());

        Self {
            database_path,
            storage,
            usda_api_key,
            fdc_base_url,
        }
    }

    pub fn uses_demo_key(&self) -> bool {
        self.usda_api_key == DEMO_API_KEY
    }
}

/// `data/nutritrack.db` under the project root when run from
/// `target/{debug,release}`, otherwise next to the executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(|target| target.parent()) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutritrack.db");
    path
}
