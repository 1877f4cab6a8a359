//! Session-scoped in-memory store
//!
//! Nothing survives the process. Measurement history keeps only the newest
//! [`MAX_SESSION_MEASUREMENTS`] records.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{NaiveDate, Utc};

use super::{
    DiaryStore, MeasurementStore, NutritionStore, ProfileStore, StoreError, StoreResult,
};
use crate::models::{FoodEntry, Measurement, NewFoodEntry, NewMeasurement};
use crate::nutrition::UserProfile;

/// Measurement records kept by a session store
pub const MAX_SESSION_MEASUREMENTS: usize = 100;

#[derive(Default)]
struct SessionData {
    entries: BTreeMap<NaiveDate, Vec<FoodEntry>>,
    measurements: Vec<Measurement>,
    profile: Option<UserProfile>,
    next_entry_id: i64,
    next_measurement_id: i64,
}

/// In-memory store for a single session
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<SessionData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&SessionData) -> T) -> StoreResult<T> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&data))
    }

    fn write<T>(&self, f: impl FnOnce(&mut SessionData) -> T) -> StoreResult<T> {
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut data))
    }
}

impl DiaryStore for MemoryStore {
    fn add_entry(&self, date: NaiveDate, entry: NewFoodEntry) -> StoreResult<FoodEntry> {
        let created = self.write(|data| {
            // Ids are never reused, even after removals
            data.next_entry_id += 1;
            let created = entry.into_entry(data.next_entry_id, date, Utc::now());
            data.entries.entry(date).or_default().push(created.clone());
            created
        })?;
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
        self.read(|data| data.entries.get(&date).cloned().unwrap_or_default())
    }

    fn remove_entry(&self, date: NaiveDate, entry_id: i64) -> StoreResult<bool> {
        let removed = self.write(|data| {
            let Some(bucket) = data.entries.get_mut(&date) else {
                return false;
            };
            let before = bucket.len();
            bucket.retain(|e| e.id != entry_id);
            let removed = bucket.len() < before;
            if bucket.is_empty() {
                data.entries.remove(&date);
            }
            removed
        })?;
        if removed {
            tracing::info!("Removed entry {} from {}", entry_id, date);
        }
        Ok(removed)
    }

    fn dates_with_entries(&self) -> StoreResult<Vec<NaiveDate>> {
        self.read(|data| data.entries.keys().rev().copied().collect())
    }

    fn clear_entries(&self) -> StoreResult<()> {
        self.write(|data| data.entries.clear())
    }
}

impl MeasurementStore for MemoryStore {
    fn add_measurement(&self, record: NewMeasurement) -> StoreResult<Measurement> {
        let created = self.write(|data| {
            data.next_measurement_id += 1;
            let created = record.into_measurement(data.next_measurement_id, Utc::now());
            data.measurements.push(created.clone());
            if data.measurements.len() > MAX_SESSION_MEASUREMENTS {
                let excess = data.measurements.len() - MAX_SESSION_MEASUREMENTS;
                data.measurements.drain(..excess);
            }
            created
        })?;
        tracing::info!("Recorded measurement {} for {}", created.id, created.date);
        Ok(created)
    }

    fn list_measurements(&self) -> StoreResult<Vec<Measurement>> {
        self.read(|data| {
            let mut history = data.measurements.clone();
            history.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
            history
        })
    }

    fn clear_measurements(&self) -> StoreResult<()> {
        self.write(|data| data.measurements.clear())
    }
}

impl ProfileStore for MemoryStore {
    fn get_profile(&self) -> StoreResult<Option<UserProfile>> {
        self.read(|data| data.profile.clone())
    }

    fn set_profile(&self, profile: &UserProfile) -> StoreResult<UserProfile> {
        self.write(|data| {
            data.profile = Some(profile.clone());
            profile.clone()
        })
    }
}

impl NutritionStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealType;
    use crate::nutrition::{Nutrient, NutrientVector};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(kcal: f64) -> NewFoodEntry {
        NewFoodEntry {
            meal_type: MealType::Snack,
            food_name: "Apple".to_string(),
            catalog_id: None,
            portion_size: 100.0,
            portion_unit: "g".to_string(),
            reference_portion: 100.0,
            nutrients: [(Nutrient::Calories, kcal)].into_iter().collect::<NutrientVector>(),
        }
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let store = MemoryStore::new();
        let day = date("2025-05-01");
        let first = store.add_entry(day, entry(52.0)).unwrap();
        let second = store.add_entry(day, entry(60.0)).unwrap();
        assert!(store.remove_entry(day, first.id).unwrap());

        let third = store.add_entry(day, entry(70.0)).unwrap();
        assert_ne!(third.id, second.id);

        let ids: Vec<i64> = store.list_entries(day).unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second.id, third.id]);
    }

    #[test]
    fn test_read_after_write_and_missing_date() {
        let store = MemoryStore::new();
        let day = date("2025-05-01");
        assert!(store.list_entries(day).unwrap().is_empty());
        store.add_entry(day, entry(52.0)).unwrap();
        assert_eq!(store.list_entries(day).unwrap().len(), 1);
        assert!(!store.remove_entry(date("2025-05-02"), 1).unwrap());
    }

    #[test]
    fn test_emptied_date_is_not_tracked() {
        let store = MemoryStore::new();
        let day = date("2025-05-01");
        let e = store.add_entry(day, entry(52.0)).unwrap();
        store.remove_entry(day, e.id).unwrap();
        assert!(store.dates_with_entries().unwrap().is_empty());
    }

    #[test]
    fn test_measurement_history_truncated_and_ordered() {
        let store = MemoryStore::new();
        let start = date("2024-01-01");
        for (i, d) in start.iter_days().take(MAX_SESSION_MEASUREMENTS + 5).enumerate() {
            store
                .add_measurement(NewMeasurement {
                    date: Some(d),
                    weight_kg: 90.0 - i as f64 * 0.1,
                    ..NewMeasurement::default()
                })
                .unwrap();
        }

        let history = store.list_measurements().unwrap();
        assert_eq!(history.len(), MAX_SESSION_MEASUREMENTS);
        assert!(history.windows(2).all(|w| w[0].date >= w[1].date));
        assert_eq!(history.last().unwrap().date, date("2024-01-06"));
    }
}
