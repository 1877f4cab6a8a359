//! Build metadata
//!
//! Version from Cargo.toml plus the build number and timestamp that
//! `build.rs` embeds at compile time.

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

const RAW_BUILD_NUMBER: Option<&str> = option_env!("NUTRITRACK_BUILD_NUMBER");
const RAW_BUILD_TIMESTAMP: Option<&str> = option_env!("NUTRITRACK_BUILD_TIMESTAMP");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// 0 when built without the build script's counter
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: RAW_BUILD_NUMBER
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
            build_timestamp: RAW_BUILD_TIMESTAMP.unwrap_or("unknown"),
        }
    }

    fn banner(&self) -> String {
        let rule = "=".repeat(47);
        format!(
            "{rule}\n  NutriTrack nutrition tracker\n  Version: {} | Build: {}\n  Compiled: {}\n{rule}",
            self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    eprintln!("{}", BuildInfo::current().banner());
}
