//! Database module
//!
//! Pooled SQLite connections and the versioned schema behind `SqliteStore`.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
