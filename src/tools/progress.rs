//! Progress MCP Tools
//!
//! Daily progress against goals, multi-day summaries, goal analysis, and
//! per-day trends.

use chrono::NaiveDate;
use serde::Serialize;

use super::profile::goal_report;
use crate::nutrition::{
    daily_progress, daily_totals, goal_analysis, nutrition_summary, trend_series, window_dates,
    DailyProgress,
    GoalAnalysis, Nutrient, NutritionSummary, TrendSeries, DEFAULT_SUMMARY_DAYS,
};
use crate::store::NutritionStore;

/// Longest window a summary or trend may cover
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Response for get_daily_progress
#[derive(Debug, Serialize)]
pub struct DailyProgressResponse {
    pub date: NaiveDate,
    pub entry_count: usize,
    #[serde(flatten)]
    pub progress: DailyProgress,
}

/// Response for get_nutrition_summary
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub end_date: NaiveDate,
    pub window_days: u32,
    #[serde(flatten)]
    pub summary: NutritionSummary,
}

/// Response for get_goal_analysis
#[derive(Debug, Serialize)]
pub struct GoalAnalysisResponse {
    pub end_date: NaiveDate,
    pub window_days: u32,
    #[serde(flatten)]
    pub analysis: GoalAnalysis,
}

/// One nutrient's per-day amounts
#[derive(Debug, Serialize)]
pub struct NutrientSeries {
    pub nutrient: Nutrient,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub values: Vec<(NaiveDate, f64)>,
    pub goal: Option<f64>,
}

/// Response for get_nutrition_trends
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub end_date: NaiveDate,
    pub window_days: u32,
    pub days_tracked: usize,
    pub series: Vec<NutrientSeries>,
}

/// Window length in days, checked against the calendar ending on `end_date`
fn window(end_date: NaiveDate, days: Option<u32>) -> Result<u32, String> {
    let days = match days.unwrap_or(DEFAULT_SUMMARY_DAYS) {
        0 => return Err("Window must be at least 1 day".to_string()),
        d if d > MAX_WINDOW_DAYS => {
            return Err(format!(
                "Window of {} days exceeds the maximum of {}",
                d, MAX_WINDOW_DAYS
            ))
        }
        d => d,
    };
    window_dates(end_date, days).map_err(|e| e.to_string())?;
    Ok(days)
}

pub fn get_daily_progress(
    store: &dyn NutritionStore,
    date: NaiveDate,
) -> Result<DailyProgressResponse, String> {
    let (_, report) = goal_report(store)?;
    let entries = store
        .list_entries(date)
        .map_err(|e| format!("Failed to get diary entries: {}", e))?;

    Ok(DailyProgressResponse {
        date,
        entry_count: entries.len(),
        progress: daily_progress(&daily_totals(&entries), &report.goals),
    })
}

pub fn get_nutrition_summary(
    store: &dyn NutritionStore,
    end_date: NaiveDate,
    days: Option<u32>,
) -> Result<SummaryResponse, String> {
    let window_days = window(end_date, days)?;
    let summary = nutrition_summary(store, end_date, window_days)
        .map_err(|e| format!("Failed to summarize diary: {}", e))?;

    Ok(SummaryResponse {
        end_date,
        window_days,
        summary,
    })
}

pub fn get_goal_analysis(
    store: &dyn NutritionStore,
    end_date: NaiveDate,
    days: Option<u32>,
) -> Result<GoalAnalysisResponse, String> {
    let window_days = window(end_date, days)?;
    let (_, report) = goal_report(store)?;
    let summary = nutrition_summary(store, end_date, window_days)
        .map_err(|e| format!("Failed to summarize diary: {}", e))?;

    Ok(GoalAnalysisResponse {
        end_date,
        window_days,
        analysis: goal_analysis(&summary, &report.goals),
    })
}

/// Per-day series for the requested nutrients (macros when none given)
pub fn get_nutrition_trends(
    store: &dyn NutritionStore,
    end_date: NaiveDate,
    days: Option<u32>,
    nutrients: &[String],
) -> Result<TrendResponse, String> {
    let window_days = window(end_date, days)?;

    let selected: Vec<Nutrient> = if nutrients.is_empty() {
        Nutrient::MACROS.to_vec()
    } else {
        nutrients
            .iter()
            .map(|id| {
                Nutrient::from_id(id.trim())
                    .ok_or_else(|| format!("Unknown nutrient '{}'", id.trim()))
            })
            .collect::<Result<_, _>>()?
    };

    let (_, report) = goal_report(store)?;
    let trend: TrendSeries = trend_series(store, end_date, window_days)
        .map_err(|e| format!("Failed to read diary: {}", e))?;

    let series = selected
        .into_iter()
        .map(|nutrient| NutrientSeries {
            nutrient,
            display_name: nutrient.display_name(),
            unit: nutrient.unit().as_str(),
            values: trend.series(nutrient),
            goal: report.goals.get(nutrient),
        })
        .collect();

    Ok(TrendResponse {
        end_date,
        window_days,
        days_tracked: trend.days_tracked,
        series,
    })
}
