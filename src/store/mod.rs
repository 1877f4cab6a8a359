//! Persistence contracts
//!
//! The calculation code never owns diary or measurement state; it reads
//! and writes through these traits. Two backends exist: a SQLite store and
//! a session-scoped in-memory store.

mod memory;
mod sqlite;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::DbError;
use crate::models::{FoodEntry, Measurement, NewFoodEntry, NewMeasurement};
use crate::nutrition::{CalcError, UserProfile};

pub use memory::{MemoryStore, MAX_SESSION_MEASUREMENTS};
pub use sqlite::SqliteStore;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("Stored data could not be encoded: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session store lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Calc(#[from] CalcError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(DbError::Sqlite(e))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Diary entries bucketed by date
///
/// A written entry is visible to the next read.
pub trait DiaryStore: Send + Sync {
    fn add_entry(&self, date: NaiveDate, entry: NewFoodEntry) -> StoreResult<FoodEntry>;

    /// Entries for a date in logging order; empty when the date has none
    fn list_entries(&self, date: NaiveDate) -> StoreResult<Vec<FoodEntry>>;

    /// Returns false when no entry with that id exists on that date
    fn remove_entry(&self, date: NaiveDate, entry_id: i64) -> StoreResult<bool>;

    /// Dates with at least one entry, newest first
    fn dates_with_entries(&self) -> StoreResult<Vec<NaiveDate>>;

    fn clear_entries(&self) -> StoreResult<()>;

    /// Every entry, oldest date first
    fn all_entries(&self) -> StoreResult<Vec<FoodEntry>> {
        let mut dates = self.dates_with_entries()?;
        dates.sort();
        let mut entries = Vec::new();
        for date in dates {
            entries.extend(self.list_entries(date)?);
        }
        Ok(entries)
    }
}

/// Append-only measurement history
pub trait MeasurementStore: Send + Sync {
    fn add_measurement(&self, record: NewMeasurement) -> StoreResult<Measurement>;

    /// History ordered newest-first
    fn list_measurements(&self) -> StoreResult<Vec<Measurement>>;

    fn clear_measurements(&self) -> StoreResult<()>;

    fn latest_measurement(&self) -> StoreResult<Option<Measurement>> {
        Ok(self.list_measurements()?.into_iter().next())
    }
}

/// Profile settings, replaced as a whole
pub trait ProfileStore: Send + Sync {
    fn get_profile(&self) -> StoreResult<Option<UserProfile>>;

    fn set_profile(&self, profile: &UserProfile) -> StoreResult<UserProfile>;

    /// The stored profile, or the default one when none has been saved
    fn profile_or_default(&self) -> StoreResult<UserProfile> {
        Ok(self.get_profile()?.unwrap_or_default())
    }
}

/// Everything a session needs
pub trait NutritionStore: DiaryStore + MeasurementStore + ProfileStore {
    /// Backend name for status output
    fn backend(&self) -> &'static str;
}
