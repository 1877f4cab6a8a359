//! Profile MCP Tools
//!
//! Settings, derived daily goals, and current body stats.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::nutrition::{
    calculate_bmi, calculate_bmr, calculate_tdee, derive_goals, ActivityLevel, BmiCategory,
    Gender, GoalReport, Nutrient, NutrientCategory, UserProfile, WeightGoal,
};
use crate::store::NutritionStore;

/// Response for get_settings
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub profile: UserProfile,
    /// True when nothing has been saved yet and defaults are in effect
    pub is_default: bool,
}

/// Partial settings update; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

/// One daily target
#[derive(Debug, Serialize)]
pub struct GoalRow {
    pub nutrient: Nutrient,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub category: NutrientCategory,
    pub target: f64,
}

/// Response for get_daily_goals
#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub profile: UserProfile,
    pub bmi: f64,
    pub bmi_category: &'static str,
    pub bmr: f64,
    pub tdee: f64,
    pub goals: Vec<GoalRow>,
}

/// Response for get_current_stats
#[derive(Debug, Serialize)]
pub struct CurrentStats {
    pub weight_kg: f64,
    /// "measurement" or "profile"
    pub weight_source: &'static str,
    pub measured_on: Option<NaiveDate>,
    pub bmi: f64,
    pub bmi_category: &'static str,
    pub bmr: f64,
    pub tdee: f64,
    pub body_fat_percent: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
}

pub fn get_settings(store: &dyn NutritionStore) -> Result<SettingsResponse, String> {
    let stored = store
        .get_profile()
        .map_err(|e| format!("Failed to load settings: {}", e))?;

    Ok(SettingsResponse {
        is_default: stored.is_none(),
        profile: stored.unwrap_or_default(),
    })
}

/// Merge an update onto the current profile
///
/// Gender and activity level are parsed leniently; the goal and numeric
/// fields are checked and a bad value rejects the whole update.
pub fn apply_update(
    current: &UserProfile,
    update: &SettingsUpdate,
) -> Result<UserProfile, String> {
    let mut profile = current.clone();

    if let Some(age) = update.age {
        profile.age = age;
    }
    if let Some(gender) = &update.gender {
        profile.gender = Gender::from_input(gender);
    }
    if let Some(weight) = update.weight_kg {
        profile.weight_kg = weight;
    }
    if let Some(height) = update.height_cm {
        profile.height_cm = height;
    }
    if let Some(activity) = &update.activity_level {
        profile.activity_level = ActivityLevel::from_input(activity);
    }
    if let Some(goal) = &update.goal {
        profile.goal = WeightGoal::parse(goal).map_err(|e| e.to_string())?;
    }

    profile.validate().map_err(|e| e.to_string())?;
    Ok(profile)
}

pub fn update_settings(
    store: &dyn NutritionStore,
    update: SettingsUpdate,
) -> Result<UserProfile, String> {
    let current = store
        .profile_or_default()
        .map_err(|e| format!("Failed to load settings: {}", e))?;

    let profile = apply_update(&current, &update)?;

    let saved = store
        .set_profile(&profile)
        .map_err(|e| format!("Failed to save settings: {}", e))?;
    tracing::info!(
        "Settings updated: age {}, {}, {} kg, {} cm, {}, {}",
        saved.age,
        saved.gender.as_str(),
        saved.weight_kg,
        saved.height_cm,
        saved.activity_level.as_str(),
        saved.goal.as_str()
    );
    Ok(saved)
}

/// Goal report for the stored (or default) profile
pub fn goal_report(store: &dyn NutritionStore) -> Result<(UserProfile, GoalReport), String> {
    let profile = store
        .profile_or_default()
        .map_err(|e| format!("Failed to load settings: {}", e))?;
    let report = derive_goals(&profile).map_err(|e| e.to_string())?;
    Ok((profile, report))
}

pub fn get_daily_goals(store: &dyn NutritionStore) -> Result<GoalsResponse, String> {
    let (profile, report) = goal_report(store)?;

    let goals = report
        .goals
        .iter()
        .map(|(nutrient, target)| GoalRow {
            nutrient,
            display_name: nutrient.display_name(),
            unit: nutrient.unit().as_str(),
            category: nutrient.category(),
            target,
        })
        .collect();

    Ok(GoalsResponse {
        profile,
        bmi: report.bmi,
        bmi_category: report.bmi_category.label(),
        bmr: report.bmr,
        tdee: report.tdee,
        goals,
    })
}

/// Body stats from the newest measurement, falling back to the profile
pub fn get_current_stats(store: &dyn NutritionStore) -> Result<CurrentStats, String> {
    let profile = store
        .profile_or_default()
        .map_err(|e| format!("Failed to load settings: {}", e))?;
    profile.validate().map_err(|e| e.to_string())?;

    let latest = store
        .latest_measurement()
        .map_err(|e| format!("Failed to load measurements: {}", e))?;

    let (weight_kg, weight_source, measured_on) = match &latest {
        Some(m) => (m.weight_kg, "measurement", Some(m.date)),
        None => (profile.weight_kg, "profile", None),
    };

    let bmi = calculate_bmi(weight_kg, profile.height_cm);
    let bmr = calculate_bmr(weight_kg, profile.height_cm, profile.age, profile.gender);

    Ok(CurrentStats {
        weight_kg,
        weight_source,
        measured_on,
        bmi,
        bmi_category: BmiCategory::from_bmi(bmi).label(),
        bmr,
        tdee: calculate_tdee(bmr, profile.activity_level),
        body_fat_percent: latest.as_ref().and_then(|m| m.body_fat_percent),
        muscle_mass_kg: latest.as_ref().and_then(|m| m.muscle_mass_kg),
    })
}
