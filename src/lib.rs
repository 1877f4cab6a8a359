//! NutriTrack Library
//!
//! Food diary, body measurements, and nutrition goal tracking served over MCP.

pub mod build_info;
pub mod catalog;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod store;
pub mod tools;
