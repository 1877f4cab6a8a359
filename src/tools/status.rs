//! NutriTrack Status Tool
//!
//! Runtime status of the service plus the usage guide returned by the
//! instructions tool.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage guide for assistants driving the tools
pub const USAGE_INSTRUCTIONS: &str = r#"
# NutriTrack Usage Guide

NutriTrack logs foods from USDA FoodData Central into a daily diary and
compares intake against goals derived from the user's profile.

## 1. Profile

- `get_settings` shows the stored profile (defaults until one is saved:
  30 years, male, 70 kg, 175 cm, moderate activity, maintain weight).
- `update_settings` changes any subset of: age, gender (male/female),
  weight_kg, height_cm, activity_level (sedentary, light, moderate,
  very_active, extremely_active), goal (lose, maintain, gain).
  An invalid value rejects the whole update and names the field.
- `get_daily_goals` returns BMI, BMR, TDEE, and every daily target.

## 2. Logging food

1. `search_foods` with a query of at least 2 characters.
2. Optionally `preview_food` with the `catalog_id` and a portion in grams.
3. `add_food_to_diary` with `catalog_id`, `portion_grams`, `meal_type`
   (breakfast, lunch, dinner, snack), and an optional `date` (YYYY-MM-DD,
   defaults to today).

Catalog amounts are per 100 g unless the food reports another serving size;
they are scaled to the portion when logged.

## 3. Reviewing the diary

- `get_diary` lists a day's entries grouped by meal with totals.
- `remove_food_entry` needs both the `date` and the `entry_id`.
- `get_daily_progress` compares a day against the goals. Status buckets:
  Very Low (<25%), Low (<50%), Moderate (<75%), Good (<100%),
  Excellent (<150%), High (150%+). Percentages are capped at 200%.

## 4. Progress over time

- `get_nutrition_summary` averages intake over the days that have entries in
  a window (default 7 days). Days without entries are not counted.
- `get_goal_analysis` splits averaged nutrients into below (<75%), on target
  (75-125%), and above (>125%), and recommends the lowest ones.
- `get_nutrition_trends` returns per-day amounts, zeros included.

## 5. Body measurements

- `add_measurement` records weight plus optional body fat %, muscle mass,
  and waist/chest/arms/thighs in cm.
- `list_measurements` is newest first; `get_measurement_trend` reports the
  change since the previous and the first measurement.
- `get_current_stats` uses the latest measured weight for BMI/BMR/TDEE.

## 6. Backup

- `export_data` returns a JSON backup; `import_data` merges one back in.
- `clear_all_data` (requires `confirm: true`) removes diary entries and
  measurements but keeps the profile.
"#;

/// Status information returned by nutritrack_status
#[derive(Debug, Clone, Serialize)]
pub struct NutriTrackStatus {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub storage_backend: &'static str,
    pub database_path: Option<String>,
    pub database_size_bytes: Option<u64>,
    pub uses_demo_api_key: bool,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service start time and storage location
pub struct StatusTracker {
    start_time: Instant,
    storage_backend: &'static str,
    database_path: Option<PathBuf>,
    uses_demo_api_key: bool,
}

impl StatusTracker {
    pub fn new(
        storage_backend: &'static str,
        database_path: Option<PathBuf>,
        uses_demo_api_key: bool,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            storage_backend,
            database_path,
            uses_demo_api_key,
        }
    }

    pub fn get_status(&self) -> NutriTrackStatus {
        let build = BuildInfo::current();

        let database_size_bytes = self
            .database_path
            .as_ref()
            .and_then(|path| std::fs::metadata(path).ok())
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriTrackStatus {
            version: build.version,
            build_number: build.build_number,
            build_timestamp: build.build_timestamp,
            storage_backend: self.storage_backend,
            database_path: self.database_path.as_ref().map(|p| p.display().to_string()),
            database_size_bytes,
            uses_demo_api_key: self.uses_demo_api_key,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
