//! Progress aggregation
//!
//! Sums diary entries into daily totals and compares them to daily goals.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::error::{CalcError, CalcResult};
use super::goals::DailyGoals;
use super::nutrients::{Nutrient, NutrientCategory};
use super::vector::NutrientVector;
use crate::models::FoodEntry;
use crate::store::{DiaryStore, StoreResult};

/// Upper bound for a reported percentage of goal
pub const MAX_GOAL_PERCENTAGE: f64 = 200.0;

/// Default window for multi-day summaries
pub const DEFAULT_SUMMARY_DAYS: u32 = 7;

/// Achievement thresholds for goal analysis (uncapped percentages)
pub const BELOW_TARGET_PERCENT: f64 = 75.0;
pub const ABOVE_TARGET_PERCENT: f64 = 125.0;

/// How many low nutrients produce recommendations
const RECOMMENDATION_LIMIT: usize = 5;

/// Status bucket for a percentage of goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientStatus {
    VeryLow,
    Low,
    Moderate,
    Good,
    Excellent,
    High,
}

impl NutrientStatus {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 25.0 {
            NutrientStatus::VeryLow
        } else if percentage < 50.0 {
            NutrientStatus::Low
        } else if percentage < 75.0 {
            NutrientStatus::Moderate
        } else if percentage < 100.0 {
            NutrientStatus::Good
        } else if percentage < 150.0 {
            NutrientStatus::Excellent
        } else {
            NutrientStatus::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NutrientStatus::VeryLow => "Very Low",
            NutrientStatus::Low => "Low",
            NutrientStatus::Moderate => "Moderate",
            NutrientStatus::Good => "Good",
            NutrientStatus::Excellent => "Excellent",
            NutrientStatus::High => "High",
        }
    }
}

/// Percentage of goal consumed, capped at 200. A zero goal yields 0.
pub fn calculate_nutrient_percentage(consumed: f64, goal: f64) -> f64 {
    if goal <= 0.0 || !goal.is_finite() {
        return 0.0;
    }
    (consumed / goal * 100.0).min(MAX_GOAL_PERCENTAGE)
}

/// Sum the nutrients of all entries
pub fn daily_totals(entries: &[FoodEntry]) -> NutrientVector {
    entries.iter().map(|e| &e.nutrients).sum()
}

/// Totals for one date, read from a diary store
pub fn daily_totals_for<S: DiaryStore + ?Sized>(
    store: &S,
    date: NaiveDate,
) -> StoreResult<NutrientVector> {
    let entries = store.list_entries(date)?;
    Ok(daily_totals(&entries))
}

/// One nutrient compared against its goal
#[derive(Debug, Clone, Serialize)]
pub struct NutrientProgress {
    pub nutrient: Nutrient,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub category: NutrientCategory,
    pub consumed: f64,
    pub goal: f64,
    pub percentage: f64,
    pub status: NutrientStatus,
    pub status_label: &'static str,
}

impl NutrientProgress {
    pub fn new(nutrient: Nutrient, consumed: f64, goal: f64) -> Self {
        let percentage = calculate_nutrient_percentage(consumed, goal);
        let status = NutrientStatus::from_percentage(percentage);
        Self {
            nutrient,
            display_name: nutrient.display_name(),
            unit: nutrient.unit().as_str(),
            category: nutrient.category(),
            consumed,
            goal,
            percentage,
            status,
            status_label: status.label(),
        }
    }
}

/// Daily progress report
#[derive(Debug, Clone, Serialize)]
pub struct DailyProgress {
    /// Calories, protein, carbohydrates, fat; always present
    pub macros: Vec<NutrientProgress>,
    /// Everything else with a goal and a non-zero intake, by category
    pub by_category: BTreeMap<NutrientCategory, Vec<NutrientProgress>>,
}

/// Compare one day's totals against the goals
pub fn daily_progress(totals: &NutrientVector, goals: &DailyGoals) -> DailyProgress {
    let macros = Nutrient::MACROS
        .iter()
        .map(|n| NutrientProgress::new(*n, totals.get(*n), goals.get(*n).unwrap_or(0.0)))
        .collect();

    let mut by_category: BTreeMap<NutrientCategory, Vec<NutrientProgress>> = BTreeMap::new();
    for category in NutrientCategory::ALL {
        if category == NutrientCategory::Macronutrients {
            continue;
        }
        let rows: Vec<NutrientProgress> = category
            .nutrients()
            .filter(|n| totals.get(*n) > 0.0)
            .filter_map(|n| goals.get(n).map(|goal| NutrientProgress::new(n, totals.get(n), goal)))
            .collect();
        if !rows.is_empty() {
            by_category.insert(category, rows);
        }
    }

    DailyProgress { macros, by_category }
}

/// Averages over the tracked days of a window
#[derive(Debug, Clone, Default, Serialize)]
pub struct NutritionSummary {
    /// Days in the window with at least one diary entry
    pub total_days: u32,
    pub avg_nutrients: NutrientVector,
    pub dates_tracked: Vec<NaiveDate>,
}

/// Average daily intake over the days that have entries
///
/// Each item is a date with its entry count and totals. Days with no
/// entries are left out of the average entirely rather than counted as
/// zero-intake days. Every nutrient is divided by the same number of
/// tracked days, so a nutrient absent on a tracked day counts as 0 for
/// that day instead of being averaged only over the days it appears.
pub fn summarize_days<I>(days: I) -> NutritionSummary
where
    I: IntoIterator<Item = (NaiveDate, usize, NutrientVector)>,
{
    let mut summary = NutritionSummary::default();
    let mut sum = NutrientVector::new();

    for (date, entry_count, totals) in days {
        if entry_count == 0 {
            continue;
        }
        summary.total_days += 1;
        summary.dates_tracked.push(date);
        sum += &totals;
    }

    if summary.total_days > 0 {
        summary.avg_nutrients = sum.scale(1.0 / f64::from(summary.total_days));
    }
    summary
}

/// Dates of a window of `days` days ending on `end_date`, oldest first
pub fn window_dates(end_date: NaiveDate, days: u32) -> CalcResult<Vec<NaiveDate>> {
    let days = days.max(1);
    let start = end_date
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .ok_or(CalcError::DateOutOfRange { end_date, days })?;
    Ok(start.iter_days().take(days as usize).collect())
}

/// Multi-day summary read from a diary store
pub fn nutrition_summary<S: DiaryStore + ?Sized>(
    store: &S,
    end_date: NaiveDate,
    days: u32,
) -> StoreResult<NutritionSummary> {
    let mut per_day = Vec::new();
    for date in window_dates(end_date, days)? {
        let entries = store.list_entries(date)?;
        per_day.push((date, entries.len(), daily_totals(&entries)));
    }
    Ok(summarize_days(per_day))
}

/// One nutrient's average intake against its goal
#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub nutrient: Nutrient,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub category: NutrientCategory,
    pub avg_consumed: f64,
    pub goal: f64,
    /// Uncapped percentage of goal
    pub percentage: f64,
}

/// Goal-achievement breakdown of a summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoalAnalysis {
    pub total_days: u32,
    pub below_target: Vec<Achievement>,
    pub on_target: Vec<Achievement>,
    pub above_target: Vec<Achievement>,
    /// Display names of the lowest nutrients, grouped by category
    pub recommendations: BTreeMap<NutrientCategory, Vec<&'static str>>,
}

/// Split averaged intake into below / on / above target
pub fn goal_analysis(summary: &NutritionSummary, goals: &DailyGoals) -> GoalAnalysis {
    let mut achievements: Vec<Achievement> = summary
        .avg_nutrients
        .iter()
        .filter_map(|(nutrient, avg)| {
            let goal = goals.get(nutrient).filter(|g| *g > 0.0)?;
            Some(Achievement {
                nutrient,
                display_name: nutrient.display_name(),
                unit: nutrient.unit().as_str(),
                category: nutrient.category(),
                avg_consumed: avg,
                goal,
                percentage: avg / goal * 100.0,
            })
        })
        .collect();

    achievements.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));

    let mut analysis = GoalAnalysis {
        total_days: summary.total_days,
        ..GoalAnalysis::default()
    };

    for achievement in achievements {
        if achievement.percentage < BELOW_TARGET_PERCENT {
            analysis.below_target.push(achievement);
        } else if achievement.percentage <= ABOVE_TARGET_PERCENT {
            analysis.on_target.push(achievement);
        } else {
            analysis.above_target.push(achievement);
        }
    }

    for low in analysis.below_target.iter().take(RECOMMENDATION_LIMIT) {
        analysis
            .recommendations
            .entry(low.category)
            .or_default()
            .push(low.display_name);
    }

    analysis
}

/// One day of a trend series
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub totals: NutrientVector,
}

/// Per-day totals over a window, including untracked days
#[derive(Debug, Clone, Serialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
    pub days_tracked: usize,
}

impl TrendSeries {
    /// Amount of one nutrient for each day, zeros included
    pub fn series(&self, nutrient: Nutrient) -> Vec<(NaiveDate, f64)> {
        self.points
            .iter()
            .map(|p| (p.date, p.totals.get(nutrient)))
            .collect()
    }
}

/// Per-day totals read from a diary store
pub fn trend_series<S: DiaryStore + ?Sized>(
    store: &S,
    end_date: NaiveDate,
    days: u32,
) -> StoreResult<TrendSeries> {
    let mut points = Vec::new();
    for date in window_dates(end_date, days)? {
        let entries = store.list_entries(date)?;
        points.push(TrendPoint {
            date,
            entry_count: entries.len(),
            totals: daily_totals(&entries),
        });
    }
    let days_tracked = points.iter().filter(|p| p.entry_count > 0).count();
    Ok(TrendSeries {
        points,
        days_tracked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::goals::{calculate_daily_goals, Gender, WeightGoal};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn vector(pairs: &[(Nutrient, f64)]) -> NutrientVector {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_percentage_cap_and_zero_goal() {
        assert!((calculate_nutrient_percentage(40.0, 97.3) - 41.109).abs() < 0.001);
        assert_eq!(calculate_nutrient_percentage(500.0, 100.0), 200.0);
        assert_eq!(calculate_nutrient_percentage(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_percentage_is_monotonic_and_bounded() {
        let goal = 97.3;
        let mut previous = f64::MIN;
        for i in 0..500 {
            let p = calculate_nutrient_percentage(f64::from(i) * 0.5, goal);
            assert!(p >= previous);
            assert!(p <= MAX_GOAL_PERCENTAGE);
            previous = p;
        }
    }

    #[test]
    fn test_status_buckets() {
        let cases = [
            (0.0, NutrientStatus::VeryLow),
            (24.99, NutrientStatus::VeryLow),
            (25.0, NutrientStatus::Low),
            (41.1, NutrientStatus::Low),
            (50.0, NutrientStatus::Moderate),
            (75.0, NutrientStatus::Good),
            (100.0, NutrientStatus::Excellent),
            (149.9, NutrientStatus::Excellent),
            (150.0, NutrientStatus::High),
            (200.0, NutrientStatus::High),
        ];
        for (pct, expected) in cases {
            assert_eq!(NutrientStatus::from_percentage(pct), expected, "{}", pct);
        }
        assert_eq!(NutrientStatus::Low.label(), "Low");
    }

    #[test]
    fn test_daily_progress_shows_macros_and_consumed_micros() {
        let goals = calculate_daily_goals(2594.3125, WeightGoal::Maintain, Gender::Male, 30);
        let totals = vector(&[(Nutrient::Protein, 40.0), (Nutrient::VitaminC, 45.0)]);

        let progress = daily_progress(&totals, &goals);
        assert_eq!(progress.macros.len(), 4);

        let protein = progress
            .macros
            .iter()
            .find(|p| p.nutrient == Nutrient::Protein)
            .unwrap();
        assert!((protein.percentage - 41.1).abs() < 0.1);
        assert_eq!(protein.status_label, "Low");

        let vitamins = &progress.by_category[&NutrientCategory::Vitamins];
        assert_eq!(vitamins.len(), 1);
        assert_eq!(vitamins[0].status, NutrientStatus::Moderate);
        assert!(!progress.by_category.contains_key(&NutrientCategory::Minerals));
    }

    #[test]
    fn test_summary_excludes_untracked_days() {
        let end = date("2025-03-07");
        let days: Vec<_> = window_dates(end, 7)
            .unwrap()
            .into_iter()
            .map(|d| {
                if d == date("2025-03-02") {
                    (d, 1, vector(&[(Nutrient::Calories, 100.0)]))
                } else if d == date("2025-03-05") {
                    (d, 2, vector(&[(Nutrient::Calories, 150.0)]))
                } else {
                    (d, 0, NutrientVector::new())
                }
            })
            .collect();

        let summary = summarize_days(days);
        assert_eq!(summary.total_days, 2);
        assert!((summary.avg_nutrients.get(Nutrient::Calories) - 125.0).abs() < 1e-9);
        assert_eq!(summary.dates_tracked, vec![date("2025-03-02"), date("2025-03-05")]);
    }

    #[test]
    fn test_summary_counts_missing_nutrient_as_zero_on_tracked_day() {
        let summary = summarize_days(vec![
            (date("2025-03-01"), 1, vector(&[(Nutrient::Iron, 6.0)])),
            (date("2025-03-02"), 1, vector(&[(Nutrient::Calories, 300.0)])),
        ]);
        assert_eq!(summary.total_days, 2);
        assert!((summary.avg_nutrients.get(Nutrient::Iron) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize_days(Vec::new());
        assert_eq!(summary.total_days, 0);
        assert!(summary.avg_nutrients.is_empty());
    }

    #[test]
    fn test_window_dates() {
        let dates = window_dates(date("2025-01-02"), 3).unwrap();
        assert_eq!(dates, vec![date("2024-12-31"), date("2025-01-01"), date("2025-01-02")]);
        assert_eq!(window_dates(date("2025-01-02"), 0).unwrap().len(), 1);
    }

    #[test]
    fn test_window_before_first_representable_date() {
        assert_eq!(window_dates(NaiveDate::MIN, 1).unwrap(), vec![NaiveDate::MIN]);
        assert_eq!(
            window_dates(NaiveDate::MIN, 7),
            Err(CalcError::DateOutOfRange {
                end_date: NaiveDate::MIN,
                days: 7
            })
        );

        let store = crate::store::MemoryStore::new();
        assert!(matches!(
            nutrition_summary(&store, NaiveDate::MIN, 7),
            Err(crate::store::StoreError::Calc(CalcError::DateOutOfRange { .. }))
        ));
        assert!(trend_series(&store, NaiveDate::MIN, 7).is_err());
    }

    #[test]
    fn test_goal_analysis_buckets() {
        let goals = calculate_daily_goals(2000.0, WeightGoal::Maintain, Gender::Male, 30);
        let summary = NutritionSummary {
            total_days: 3,
            avg_nutrients: vector(&[
                (Nutrient::Calories, 2000.0),
                (Nutrient::VitaminC, 30.0),
                (Nutrient::Sodium, 4600.0),
                (Nutrient::Iron, 2.0),
                (Nutrient::MonounsaturatedFat, 12.0),
            ]),
            dates_tracked: Vec::new(),
        };

        let analysis = goal_analysis(&summary, &goals);
        assert_eq!(analysis.total_days, 3);

        let below: Vec<_> = analysis.below_target.iter().map(|a| a.nutrient).collect();
        assert_eq!(below, vec![Nutrient::Iron, Nutrient::VitaminC]);
        assert_eq!(analysis.on_target[0].nutrient, Nutrient::Calories);
        assert!((analysis.above_target[0].percentage - 200.0).abs() < 1e-9);

        assert_eq!(
            analysis.recommendations[&NutrientCategory::Minerals],
            vec!["Iron"]
        );
        assert_eq!(
            analysis.recommendations[&NutrientCategory::Vitamins],
            vec!["Vitamin C"]
        );
    }

    #[test]
    fn test_store_backed_summary_and_trend() {
        use crate::models::{MealType, NewFoodEntry};
        use crate::store::{DiaryStore, MemoryStore};

        let store = MemoryStore::new();
        for (d, kcal) in [("2025-03-02", 100.0), ("2025-03-05", 60.0), ("2025-03-05", 90.0)] {
            store
                .add_entry(
                    date(d),
                    NewFoodEntry {
                        meal_type: MealType::Dinner,
                        food_name: "Soup".to_string(),
                        catalog_id: None,
                        portion_size: 100.0,
                        portion_unit: "g".to_string(),
                        reference_portion: 100.0,
                        nutrients: vector(&[(Nutrient::Calories, kcal)]),
                    },
                )
                .unwrap();
        }

        let end = date("2025-03-07");
        let summary = nutrition_summary(&store, end, 7).unwrap();
        assert_eq!(summary.total_days, 2);
        assert!((summary.avg_nutrients.get(Nutrient::Calories) - 125.0).abs() < 1e-9);

        let trend = trend_series(&store, end, 7).unwrap();
        assert_eq!(trend.points.len(), 7);
        assert_eq!(trend.days_tracked, 2);
        let calories = trend.series(Nutrient::Calories);
        assert_eq!(calories[0], (date("2025-03-01"), 0.0));
        assert_eq!(calories[4], (date("2025-03-05"), 150.0));

        let totals = daily_totals_for(&store, date("2025-03-05")).unwrap();
        assert_eq!(totals.get(Nutrient::Calories), 150.0);
    }
}
