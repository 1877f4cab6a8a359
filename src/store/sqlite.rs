//! SQLite-backed store

use chrono::NaiveDate;

use super::{DiaryStore, MeasurementStore, NutritionStore, ProfileStore, StoreResult};
use crate::db::{migrations, Database};
use crate::models::{profile, FoodEntry, Measurement, NewFoodEntry, NewMeasurement};
use crate::nutrition::UserProfile;

/// Relational store over a pooled SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    database: Database,
}

impl SqliteStore {
    /// Wrap a database, bringing its schema up to date
    pub fn new(database: Database) -> StoreResult<Self> {
        database.with_transaction(migrations::run_migrations)?;
        Ok(Self { database })
    }

    /// Fresh in-memory database with the schema applied
    pub fn in_memory() -> StoreResult<Self> {
        Self::new(Database::in_memory()?)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl DiaryStore for SqliteStore {
    fn add_entry(&self, date: NaiveDate, entry: NewFoodEntry) -> StoreResult<FoodEntry> {
        let created = self
            .database
            .with_conn(|conn| FoodEntry::create(conn, date, &entry))?;
        tracing::info!(
            "Logged '{}' ({} g) for {} as entry {}",
            created.food_name,
            created.portion_size,
            date,
            created.id
        );
        Ok(created)
    }

    fn list_entries(&self, date: NaiveDate) -> StoreResult<Vec<FoodEntry>> {
        Ok(self
            .database
            .with_conn(|conn| FoodEntry::list_for_date(conn, date))?)
    }

    fn remove_entry(&self, date: NaiveDate, entry_id: i64) -> StoreResult<bool> {
        let removed = self
            .database
            .with_conn(|conn| FoodEntry::delete(conn, date, entry_id))?;
        if removed {
            tracing::info!("Removed entry {} from {}", entry_id, date);
        }
        Ok(removed)
    }

    fn dates_with_entries(&self) -> StoreResult<Vec<NaiveDate>> {
        Ok(self.database.with_conn(FoodEntry::dates_with_entries)?)
    }

    fn clear_entries(&self) -> StoreResult<()> {
        let removed = self.database.with_conn(FoodEntry::delete_all)?;
        tracing::info!("Cleared {} diary entries", removed);
        Ok(())
    }

    fn all_entries(&self) -> StoreResult<Vec<FoodEntry>> {
        Ok(self.database.with_conn(FoodEntry::list_all)?)
    }
}

impl MeasurementStore for SqliteStore {
    fn add_measurement(&self, record: NewMeasurement) -> StoreResult<Measurement> {
        let created = self
            .database
            .with_conn(|conn| Measurement::create(conn, &record))?;
        tracing::info!("Recorded measurement {} for {}", created.id, created.date);
        Ok(created)
    }

    fn list_measurements(&self) -> StoreResult<Vec<Measurement>> {
        Ok(self.database.with_conn(Measurement::list)?)
    }

    fn clear_measurements(&self) -> StoreResult<()> {
        let removed = self.database.with_conn(Measurement::delete_all)?;
        tracing::info!("Cleared {} measurements", removed);
        Ok(())
    }
}

impl ProfileStore for SqliteStore {
    fn get_profile(&self) -> StoreResult<Option<UserProfile>> {
        Ok(self.database.with_conn(profile::get)?)
    }

    fn set_profile(&self, data: &UserProfile) -> StoreResult<UserProfile> {
        Ok(self.database.with_conn(|conn| profile::set(conn, data))?)
    }
}

impl NutritionStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
