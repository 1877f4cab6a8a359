//! Nutrition calculation module
//!
//! Goal derivation, portion scaling, catalog normalization, unit
//! conversions, and progress aggregation.

pub mod error;
pub mod goals;
pub mod normalize;
pub mod nutrients;
pub mod portion;
pub mod progress;
pub mod units;
pub mod vector;

pub use error::{CalcError, CalcResult};
pub use goals::{
    calculate_bmi, calculate_bmr, calculate_daily_goals, calculate_meal_calories,
    calculate_tdee, derive_goals, ActivityLevel, BmiCategory, DailyGoals, Gender, GoalReport,
    UserProfile, WeightGoal,
};
pub use normalize::{normalize_nutrients, normalize_nutrients_strict, CatalogNutrient};
pub use nutrients::{Nutrient, NutrientCategory, NutrientUnit};
pub use portion::{reference_portion_grams, scale_nutrients_by_portion, DEFAULT_REFERENCE_PORTION_G};
pub use progress::{
    daily_progress, daily_totals, daily_totals_for, goal_analysis, nutrition_summary,
    trend_series, window_dates, DailyProgress, GoalAnalysis, NutrientProgress, NutrientStatus,
    NutritionSummary, TrendSeries, DEFAULT_SUMMARY_DAYS,
};
pub use units::{categorize_unit, convert_amount, UnitCategory};
pub use vector::NutrientVector;
