//! Data Backup MCP Tools
//!
//! JSON export of everything a store holds, merge-import of such an export,
//! and clearing the diary and measurement history.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{FoodEntry, Measurement, NewFoodEntry, NewMeasurement};
use crate::nutrition::UserProfile;
use crate::store::NutritionStore;

/// Full backup document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataExport {
    pub export_date: DateTime<Utc>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub daily_entries: BTreeMap<NaiveDate, Vec<FoodEntry>>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

/// Response for import_data
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub entries_imported: usize,
    pub measurements_imported: usize,
    pub profile_imported: bool,
}

/// Response for clear_all_data
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub entries_removed: usize,
    pub measurements_removed: usize,
}

pub fn export_data(store: &dyn NutritionStore) -> Result<DataExport, String> {
    let entries = store
        .all_entries()
        .map_err(|e| format!("Failed to read diary: {}", e))?;
    let measurements = store
        .list_measurements()
        .map_err(|e| format!("Failed to read measurements: {}", e))?;
    let user_profile = store
        .get_profile()
        .map_err(|e| format!("Failed to read settings: {}", e))?;

    let mut daily_entries: BTreeMap<NaiveDate, Vec<FoodEntry>> = BTreeMap::new();
    for entry in entries {
        daily_entries.entry(entry.date).or_default().push(entry);
    }

    Ok(DataExport {
        export_date: Utc::now(),
        user_profile,
        daily_entries,
        measurements,
    })
}

/// Merge a backup into the store
///
/// Entries and measurements are appended with fresh ids; a profile in the
/// backup replaces the stored one. The backup is checked in full before
/// anything is written.
pub fn import_data(
    store: &dyn NutritionStore,
    backup: DataExport,
) -> Result<ImportResponse, String> {
    if let Some(profile) = &backup.user_profile {
        profile
            .validate()
            .map_err(|e| format!("Backup profile rejected: {}", e))?;
    }

    let measurements: Vec<NewMeasurement> = backup
        .measurements
        .into_iter()
        // History is stored oldest-first so the newest stays newest
        .rev()
        .map(|m| NewMeasurement {
            date: Some(m.date),
            weight_kg: m.weight_kg,
            body_fat_percent: m.body_fat_percent,
            muscle_mass_kg: m.muscle_mass_kg,
            waist_cm: m.waist_cm,
            chest_cm: m.chest_cm,
            arms_cm: m.arms_cm,
            thighs_cm: m.thighs_cm,
            notes: m.notes,
        })
        .collect();
    for record in &measurements {
        record
            .validate()
            .map_err(|e| format!("Backup measurement rejected: {}", e))?;
    }

    let mut entries: Vec<(NaiveDate, NewFoodEntry)> = Vec::new();
    for (date, day_entries) in backup.daily_entries {
        for entry in day_entries {
            if !(entry.portion_size > 0.0 && entry.reference_portion > 0.0) {
                return Err(format!(
                    "Backup entry '{}' on {} has an invalid portion",
                    entry.food_name, date
                ));
            }
            entries.push((
                date,
                NewFoodEntry {
                    meal_type: entry.meal_type,
                    food_name: entry.food_name,
                    catalog_id: entry.catalog_id,
                    portion_size: entry.portion_size,
                    portion_unit: entry.portion_unit,
                    reference_portion: entry.reference_portion,
                    nutrients: entry.nutrients,
                },
            ));
        }
    }

    let entries_imported = entries.len();
    for (date, entry) in entries {
        store
            .add_entry(date, entry)
            .map_err(|e| format!("Failed to import entry: {}", e))?;
    }

    let measurements_imported = measurements.len();
    for record in measurements {
        store
            .add_measurement(record)
            .map_err(|e| format!("Failed to import measurement: {}", e))?;
    }

    let profile_imported = match &backup.user_profile {
        Some(profile) => {
            store
                .set_profile(profile)
                .map_err(|e| format!("Failed to import settings: {}", e))?;
            true
        }
        None => false,
    };

    tracing::info!(
        "Imported {} entries and {} measurements",
        entries_imported,
        measurements_imported
    );
    Ok(ImportResponse {
        entries_imported,
        measurements_imported,
        profile_imported,
    })
}

/// Parse a backup document from JSON text
pub fn parse_backup(json: &str) -> Result<DataExport, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid backup JSON: {}", e))
}

/// Remove every diary entry and measurement; settings are kept
pub fn clear_all_data(store: &dyn NutritionStore) -> Result<ClearResponse, String> {
    let entries_removed = store
        .all_entries()
        .map_err(|e| format!("Failed to read diary: {}", e))?
        .len();
    let measurements_removed = store
        .list_measurements()
        .map_err(|e| format!("Failed to read measurements: {}", e))?
        .len();

    store
        .clear_entries()
        .map_err(|e| format!("Failed to clear diary: {}", e))?;
    store
        .clear_measurements()
        .map_err(|e| format!("Failed to clear measurements: {}", e))?;

    tracing::info!(
        "Cleared all data: {} entries, {} measurements",
        entries_removed,
        measurements_removed
    );
    Ok(ClearResponse {
        entries_removed,
        measurements_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealType;
    use crate::nutrition::{Gender, Nutrient, NutrientVector};
    use crate::store::{DiaryStore, MeasurementStore, MemoryStore, ProfileStore, SqliteStore};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn seed(store: &dyn NutritionStore) {
        for (d, kcal) in [("2025-08-01", 300.0), ("2025-08-02", 450.0), ("2025-08-02", 120.0)] {
            store
                .add_entry(
                    date(d),
                    NewFoodEntry {
                        meal_type: MealType::Breakfast,
                        food_name: "Oatmeal".to_string(),
                        catalog_id: Some(173904),
                        portion_size: 80.0,
                        portion_unit: "g".to_string(),
                        reference_portion: 100.0,
                        nutrients: [(Nutrient::Calories, kcal)]
                            .into_iter()
                            .collect::<NutrientVector>(),
                    },
                )
                .unwrap();
        }
        for (d, w) in [("2025-08-01", 75.0), ("2025-08-03", 74.4)] {
            store
                .add_measurement(NewMeasurement {
                    date: Some(date(d)),
                    weight_kg: w,
                    ..NewMeasurement::default()
                })
                .unwrap();
        }
        store
            .set_profile(&UserProfile {
                gender: Gender::Female,
                ..UserProfile::default()
            })
            .unwrap();
    }

    #[test]
    fn test_export_import_between_backends() {
        let source = SqliteStore::in_memory().unwrap();
        seed(&source);

        let export = export_data(&source).unwrap();
        assert_eq!(export.daily_entries.len(), 2);
        assert_eq!(export.daily_entries[&date("2025-08-02")].len(), 2);
        assert_eq!(export.measurements.len(), 2);

        let json = serde_json::to_string(&export).unwrap();
        let backup = parse_backup(&json).unwrap();

        let target = MemoryStore::new();
        let response = import_data(&target, backup).unwrap();
        assert_eq!(response.entries_imported, 3);
        assert_eq!(response.measurements_imported, 2);
        assert!(response.profile_imported);

        assert_eq!(target.list_entries(date("2025-08-02")).unwrap().len(), 2);
        assert_eq!(target.latest_measurement().unwrap().unwrap().weight_kg, 74.4);
        assert_eq!(target.get_profile().unwrap().unwrap().gender, Gender::Female);
    }

    #[test]
    fn test_import_merges() {
        let store = MemoryStore::new();
        seed(&store);
        let export = export_data(&store).unwrap();
        import_data(&store, export).unwrap();
        assert_eq!(store.all_entries().unwrap().len(), 6);
        assert_eq!(store.list_measurements().unwrap().len(), 4);
    }

    #[test]
    fn test_invalid_backup_writes_nothing() {
        let store = MemoryStore::new();
        let json = r#"{
            "export_date": "2025-08-04T10:00:00Z",
            "measurements": [{
                "id": 1, "date": "2025-08-01", "weight_kg": -2.0,
                "body_fat_percent": null, "muscle_mass_kg": null, "waist_cm": null,
                "chest_cm": null, "arms_cm": null, "thighs_cm": null, "notes": null,
                "created_at": "2025-08-01T08:00:00Z"
            }]
        }"#;
        let backup = parse_backup(json).unwrap();
        assert!(import_data(&store, backup).unwrap_err().contains("weight_kg"));
        assert!(store.list_measurements().unwrap().is_empty());

        assert!(parse_backup("not json").unwrap_err().contains("Invalid backup JSON"));
    }

    #[test]
    fn test_bad_entry_late_in_backup_writes_nothing() {
        let source = MemoryStore::new();
        seed(&source);
        let mut export = export_data(&source).unwrap();
        export
            .daily_entries
            .get_mut(&date("2025-08-02"))
            .unwrap()[1]
            .portion_size = 0.0;

        let target = MemoryStore::new();
        let err = import_data(&target, export).unwrap_err();
        assert!(err.contains("invalid portion"));
        assert!(target.all_entries().unwrap().is_empty());
        assert!(target.list_measurements().unwrap().is_empty());
        assert!(target.get_profile().unwrap().is_none());
    }

    #[test]
    fn test_clear_keeps_profile() {
        let store = MemoryStore::new();
        seed(&store);
        let response = clear_all_data(&store).unwrap();
        assert_eq!(response.entries_removed, 3);
        assert_eq!(response.measurements_removed, 2);
        assert!(store.dates_with_entries().unwrap().is_empty());
        assert!(store.list_measurements().unwrap().is_empty());
        assert!(store.get_profile().unwrap().is_some());
    }
}
