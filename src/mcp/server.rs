//! NutriTrack MCP Server Implementation
//!
//! Exposes the profile, diary, measurement, progress, and backup tools over MCP.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::catalog::FoodCatalog;
use crate::models::NewMeasurement;
use crate::store::NutritionStore;
use crate::tools::profile::SettingsUpdate;
use crate::tools::status::StatusTracker;
use crate::tools::{data, diary, measurements, parse_date, profile, progress};

/// NutriTrack MCP Service
#[derive(Clone)]
pub struct NutriTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    store: Arc<dyn NutritionStore>,
    catalog: Arc<dyn FoodCatalog>,
    tool_router: ToolRouter<NutriTrackService>,
}

impl NutriTrackService {
    pub fn new(
        status_tracker: StatusTracker,
        store: Arc<dyn NutritionStore>,
        catalog: Arc<dyn FoodCatalog>,
    ) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(status_tracker)),
            store,
            catalog,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn join_error(e: tokio::task::JoinError) -> McpError {
    McpError::internal_error(format!("Catalog task failed: {}", e), None)
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateSettingsParams {
    /// Age in years (1-150)
    pub age: Option<u32>,
    /// "male" or "female"
    pub gender: Option<String>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// sedentary, light, moderate, very_active, or extremely_active
    pub activity_level: Option<String>,
    /// lose, maintain, or gain
    pub goal: Option<String>,
}

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Search text, at least 2 characters
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewFoodParams {
    /// FoodData Central id from search_foods
    pub catalog_id: i64,
    /// Portion in grams
    #[serde(default = "default_portion_grams")]
    pub portion_grams: f64,
}

fn default_portion_grams() -> f64 {
    100.0
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodToDiaryParams {
    /// FoodData Central id from search_foods
    pub catalog_id: i64,
    /// Portion in grams
    pub portion_grams: f64,
    /// breakfast, lunch, dinner, or snack
    pub meal_type: String,
    /// Date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveFoodEntryParams {
    /// Date the entry was logged on (YYYY-MM-DD)
    pub date: String,
    /// Entry id from get_diary
    pub entry_id: i64,
}

// ============================================================================
// Measurement Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMeasurementParams {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    /// Body fat percentage (0-100)
    pub body_fat_percent: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub arms_cm: Option<f64>,
    pub thighs_cm: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMeasurementsParams {
    /// Maximum number of measurements to return, newest first
    pub limit: Option<usize>,
}

// ============================================================================
// Progress Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WindowParams {
    /// Last day of the window (YYYY-MM-DD), defaults to today
    pub end_date: Option<String>,
    /// Window length in days (default 7)
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TrendParams {
    /// Last day of the window (YYYY-MM-DD), defaults to today
    pub end_date: Option<String>,
    /// Window length in days (default 7)
    pub days: Option<u32>,
    /// Nutrient ids such as "protein" or "vitamin_c"; macros when empty
    #[serde(default)]
    pub nutrients: Vec<String>,
}

// ============================================================================
// Backup Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportDataParams {
    /// Backup document produced by export_data, as JSON text
    pub backup_json: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClearAllDataParams {
    /// Must be true to delete all diary entries and measurements
    #[serde(default)]
    pub confirm: bool,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriTrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriTrack service including build info, storage backend, and process information")]
    async fn nutritrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get the usage guide for NutriTrack. Call this when starting a session or when unsure which tool to use.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::USAGE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Get the user profile (age, gender, weight, height, activity level, goal). Defaults apply until settings are saved.")]
    fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_settings(self.store.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update any subset of the user profile. An invalid value rejects the whole update.")]
    fn update_settings(&self, Parameters(p): Parameters<UpdateSettingsParams>) -> Result<CallToolResult, McpError> {
        let update = SettingsUpdate {
            age: p.age,
            gender: p.gender,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            activity_level: p.activity_level,
            goal: p.goal,
        };
        let result = profile::update_settings(self.store.as_ref(), update)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get BMI, BMR, TDEE, and daily nutrient targets derived from the profile")]
    fn get_daily_goals(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_daily_goals(self.store.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get BMI, BMR, and TDEE using the latest measured weight (profile weight if none recorded)")]
    fn get_current_stats(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_current_stats(self.store.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Food Diary ---

    #[tool(description = "Search USDA FoodData Central (Foundation and SR Legacy foods). Queries shorter than 2 characters return no results.")]
    async fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let catalog = Arc::clone(&self.catalog);
        let result = tokio::task::spawn_blocking(move || diary::search_foods(catalog.as_ref(), &p.query))
            .await
            .map_err(join_error)?
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Show the nutrients of a catalog food scaled to a portion in grams without logging it")]
    async fn preview_food(&self, Parameters(p): Parameters<PreviewFoodParams>) -> Result<CallToolResult, McpError> {
        let catalog = Arc::clone(&self.catalog);
        let result = tokio::task::spawn_blocking(move || {
            diary::preview_food(catalog.as_ref(), p.catalog_id, p.portion_grams)
        })
        .await
        .map_err(join_error)?
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a catalog food into the diary. Nutrients are scaled from the food's reference portion to portion_grams.")]
    async fn add_food_to_diary(&self, Parameters(p): Parameters<AddFoodToDiaryParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let store = Arc::clone(&self.store);
        let catalog = Arc::clone(&self.catalog);
        let entry = tokio::task::spawn_blocking(move || {
            diary::add_food_to_diary(
                store.as_ref(),
                catalog.as_ref(),
                date,
                &p.meal_type,
                p.catalog_id,
                p.portion_grams,
            )
        })
        .await
        .map_err(join_error)?
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&entry)
    }

    #[tool(description = "Get a day's diary grouped by meal with per-meal and daily totals")]
    fn get_diary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let result = diary::get_diary(self.store.as_ref(), date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove a diary entry by date and entry id")]
    fn remove_food_entry(&self, Parameters(p): Parameters<RemoveFoodEntryParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(Some(p.date.as_str())).map_err(|e| McpError::internal_error(e, None))?;
        let result = diary::remove_food_entry(self.store.as_ref(), date, p.entry_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the summed nutrients for a day")]
    fn get_daily_totals(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let result = diary::get_daily_totals(self.store.as_ref(), date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Measurements ---

    #[tool(description = "Record a body measurement (weight required; body fat, muscle mass, and circumferences optional)")]
    fn add_measurement(&self, Parameters(p): Parameters<AddMeasurementParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let record = NewMeasurement {
            date: Some(date),
            weight_kg: p.weight_kg,
            body_fat_percent: p.body_fat_percent,
            muscle_mass_kg: p.muscle_mass_kg,
            waist_cm: p.waist_cm,
            chest_cm: p.chest_cm,
            arms_cm: p.arms_cm,
            thighs_cm: p.thighs_cm,
            notes: p.notes,
        };
        let result = measurements::add_measurement(self.store.as_ref(), record)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List body measurements, newest first")]
    fn list_measurements(&self, Parameters(p): Parameters<ListMeasurementsParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::list_measurements(self.store.as_ref(), p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the latest measurement and the change since the previous and the first one")]
    fn get_measurement_trend(&self) -> Result<CallToolResult, McpError> {
        let result = measurements::get_measurement_trend(self.store.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Progress ---

    #[tool(description = "Compare a day's intake against the daily goals with a status per nutrient")]
    fn get_daily_progress(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let result = progress::get_daily_progress(self.store.as_ref(), date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Average daily intake over the days with entries in a window ending on end_date")]
    fn get_nutrition_summary(&self, Parameters(p): Parameters<WindowParams>) -> Result<CallToolResult, McpError> {
        let end_date = parse_date(p.end_date.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let result = progress::get_nutrition_summary(self.store.as_ref(), end_date, p.days)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Classify averaged nutrients as below, on, or above target and recommend the lowest ones")]
    fn get_goal_analysis(&self, Parameters(p): Parameters<WindowParams>) -> Result<CallToolResult, McpError> {
        let end_date = parse_date(p.end_date.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let result = progress::get_goal_analysis(self.store.as_ref(), end_date, p.days)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Per-day amounts of selected nutrients over a window, with the daily goal for each")]
    fn get_nutrition_trends(&self, Parameters(p): Parameters<TrendParams>) -> Result<CallToolResult, McpError> {
        let end_date = parse_date(p.end_date.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        let result = progress::get_nutrition_trends(self.store.as_ref(), end_date, p.days, &p.nutrients)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Backup ---

    #[tool(description = "Export the profile, all diary entries, and all measurements as a JSON backup")]
    fn export_data(&self) -> Result<CallToolResult, McpError> {
        let result = data::export_data(self.store.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Merge a JSON backup from export_data into the current data. The backup is validated before anything is written.")]
    fn import_data(&self, Parameters(p): Parameters<ImportDataParams>) -> Result<CallToolResult, McpError> {
        let backup = data::parse_backup(&p.backup_json).map_err(|e| McpError::internal_error(e, None))?;
        let result = data::import_data(self.store.as_ref(), backup)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete all diary entries and measurements (settings are kept). Requires confirm=true.")]
    fn clear_all_data(&self, Parameters(p): Parameters<ClearAllDataParams>) -> Result<CallToolResult, McpError> {
        if !p.confirm {
            return Err(McpError::internal_error(
                "clear_all_data requires confirm=true".to_string(),
                None,
            ));
        }
        let result = data::clear_all_data(self.store.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutritrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriTrack - Food diary and nutrition goal tracking backed by USDA FoodData Central. \
                 Call usage_instructions first. \
                 Profile: get_settings, update_settings, get_daily_goals, get_current_stats. \
                 Diary: search_foods, preview_food, add_food_to_diary, get_diary, remove_food_entry, get_daily_totals. \
                 Measurements: add_measurement, list_measurements, get_measurement_trend. \
                 Progress: get_daily_progress, get_nutrition_summary, get_goal_analysis, get_nutrition_trends. \
                 Backup: export_data, import_data, clear_all_data (requires confirm=true). \
                 Dates are YYYY-MM-DD and default to today."
                    .into(),
            ),
        }
    }
}
