//! NutriLens MCP Server Implementation
//!
//! Implements the MCP server with all NutriLens tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::analysis::{AnalyzedFood, FoodAnalyzer};
use crate::config::Config;
use crate::db::Database;
use crate::models::{MealItemCreate, Nutrition, ProfileUpdate};
use crate::tools::analysis::{self, AnalyzePhotoInput};
use crate::tools::meals::{self, LogMealInput};
use crate::tools::profile::{self, parse_activity_level, parse_gender, ProfileInput};
use crate::tools::status::StatusTracker;
use crate::tools::{blood_sugar, guidance, medications, progress, targets, water};

/// NutriLens MCP Service
#[derive(Clone)]
pub struct NutriLensService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    /// None when no analysis endpoint is configured
    analyzer: Option<Arc<dyn FoodAnalyzer>>,
    tool_router: ToolRouter<NutriLensService>,
}

impl NutriLensService {
    pub fn new(config: &Config, database: Database, analyzer: Option<Arc<dyn FoodAnalyzer>>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.database_path.clone(),
                config.analysis_url.clone(),
            ))),
            database,
            analyzer,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn tool_error(e: String) -> McpError {
    McpError::internal_error(e, None)
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: Option<String>,
    /// "male" or "female"
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: u32,
    /// sedentary, light, moderate, active or very_active (stored only)
    pub activity_level: Option<String>,
    /// Goal tags such as weight_loss, muscle_gain, maintain_weight
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Override the computed daily water goal
    pub water_goal_glasses: Option<u32>,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    /// Mark onboarding complete (default true)
    #[serde(default = "default_true")]
    pub complete_onboarding: bool,
}

fn default_true() -> bool { true }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub age_years: Option<u32>,
    pub activity_level: Option<String>,
    /// Replaces the whole goal list
    pub goals: Option<Vec<String>>,
    pub medical_conditions: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    /// 0 clears the override
    pub water_goal_glasses: Option<u32>,
    pub notifications_enabled: Option<bool>,
}

// ============================================================================
// Target & Guidance Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateTargetsParams {
    /// "male" or "female"
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: f64,
    #[serde(default)]
    pub goals: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HealthGuidanceParams {
    /// Condition tags; uses the profile when both lists are omitted
    pub medical_conditions: Option<Vec<String>>,
    /// Allergy tags; uses the profile when both lists are omitted
    pub allergies: Option<Vec<String>>,
}

/// A food item, as detected in a photo or entered by hand
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodItemParam {
    pub name: String,
    /// Portion description (default "1 serving")
    #[serde(default = "default_portion")]
    pub portion: String,
    #[serde(default)]
    pub calories: f64,
    /// Grams
    #[serde(default)]
    pub protein: f64,
    /// Grams
    #[serde(default)]
    pub carbs: f64,
    /// Grams
    #[serde(default)]
    pub fat: f64,
    /// Allergen tags, e.g. dairy, tree_nut
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Warning tags, e.g. high_sodium, high_sugar
    #[serde(default)]
    pub health_warnings: Vec<String>,
    /// Detection confidence 0-1 (default 1.0 for manual entries)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_portion() -> String { "1 serving".to_string() }
fn default_confidence() -> f64 { 1.0 }

impl From<FoodItemParam> for AnalyzedFood {
    fn from(p: FoodItemParam) -> Self {
        Self {
            name: p.name,
            confidence: p.confidence,
            portion: p.portion,
            nutrition: Nutrition::new(p.calories, p.protein, p.carbs, p.fat),
            allergens: p.allergens,
            health_warnings: p.health_warnings,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckAllergensParams {
    pub items: Vec<FoodItemParam>,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeMealPhotoParams {
    /// Path to a local image file
    pub image_path: Option<String>,
    /// Base64 image data, optionally as a data URL
    pub image_base64: Option<String>,
    /// Public image URL
    pub image_url: Option<String>,
    /// Log all detected items as a meal (default false)
    #[serde(default)]
    pub log: bool,
    /// breakfast, lunch, dinner or snack (used when logging)
    pub meal_type: Option<String>,
    /// YYYY-MM-DD, defaults to today (used when logging)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    /// breakfast, lunch, dinner or snack
    pub meal_type: Option<String>,
    pub name: Option<String>,
    pub notes: Option<String>,
    /// Image path or URL the items came from
    pub image_ref: Option<String>,
    pub items: Vec<FoodItemParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealIdParams {
    /// Meal ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealsParams {
    /// YYYY-MM-DD; omit for the most recent meals
    pub date: Option<String>,
    /// Maximum recent meals (default 20, max 200)
    pub limit: Option<i64>,
}

// ============================================================================
// Daily Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWaterParams {
    /// Glasses to add; negative to undo
    pub glasses: i64,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogBloodSugarParams {
    pub glucose_mg_dl: f64,
    /// fasting, before_meal, after_meal, bedtime or random (default random)
    pub measurement_type: Option<String>,
    pub notes: Option<String>,
    /// "YYYY-MM-DD HH:MM:SS", defaults to now
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListBloodSugarParams {
    /// Maximum readings when no range is given (default 30)
    pub limit: Option<i64>,
    /// YYYY-MM-DD inclusive
    pub start_date: Option<String>,
    /// YYYY-MM-DD inclusive, defaults to today
    pub end_date: Option<String>,
}

// ============================================================================
// Medication Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMedicationReminderParams {
    pub name: String,
    /// e.g. "500 mg"
    pub dosage: Option<String>,
    /// daily, twice_daily, three_times_daily, weekly or as_needed
    pub frequency: Option<String>,
    /// Times of day as HH:MM
    #[serde(default)]
    pub reminder_times: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMedicationRemindersParams {
    /// Only active reminders (default true)
    #[serde(default = "default_true")]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MedicationIdParams {
    /// Reminder ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetMedicationActiveParams {
    /// Reminder ID
    pub id: i64,
    pub active: bool,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriLensService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriLens service including build info, database status, analysis endpoint, and process information")]
    async fn nutrilens_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for using NutriLens. Call this at the start of a session or when unsure how targets, meal logging or screening work.")]
    fn nutrition_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::NUTRITION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(NUTRITION_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Get the user profile with BMI and nutrition targets")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database).map_err(tool_error)?;
        match result {
            Some(p) => json_result(&p),
            None => Ok(CallToolResult::success(vec![Content::text(
                r#"{"error": "No profile found. Use set_profile to create one."}"#,
            )])),
        }
    }

    #[tool(description = "Create or replace the user profile (gender, height, weight, age, goals, conditions, allergies). Returns the computed targets.")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let input = ProfileInput {
            first_name: p.first_name, last_name: p.last_name, email: p.email, gender: p.gender,
            height_cm: p.height_cm, weight_kg: p.weight_kg, age_years: p.age_years,
            activity_level: p.activity_level, goals: p.goals,
            medical_conditions: p.medical_conditions, allergies: p.allergies,
            water_goal_glasses: p.water_goal_glasses,
            notifications_enabled: p.notifications_enabled,
            complete_onboarding: p.complete_onboarding,
        };
        let result = profile::set_profile(&self.database, input).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Update individual profile fields. Omitted fields are unchanged; list fields replace the stored list.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let data = ProfileUpdate {
            first_name: p.first_name, last_name: p.last_name, email: p.email,
            gender: p.gender.as_deref().map(parse_gender).transpose().map_err(tool_error)?,
            height_cm: p.height_cm, weight_kg: p.weight_kg, age_years: p.age_years,
            activity_level: p.activity_level.as_deref().map(parse_activity_level).transpose().map_err(tool_error)?,
            goals: p.goals, medical_conditions: p.medical_conditions, allergies: p.allergies,
            water_goal_glasses: p.water_goal_glasses,
            notifications_enabled: p.notifications_enabled,
        };
        let result = profile::update_profile(&self.database, data).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Targets ---

    #[tool(description = "Calculate BMR, TDEE, calorie, macro and water targets from explicit inputs without storing anything")]
    fn calculate_targets(&self, Parameters(p): Parameters<CalculateTargetsParams>) -> Result<CallToolResult, McpError> {
        let result = targets::calculate_targets(&p.gender, p.height_cm, p.weight_kg, p.age_years, &p.goals)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get nutrition targets, macro split, BMI and water goal for the stored profile")]
    fn get_my_targets(&self) -> Result<CallToolResult, McpError> {
        let result = targets::get_my_targets(&self.database).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Explain step by step how the stored profile's targets were calculated")]
    fn explain_targets(&self) -> Result<CallToolResult, McpError> {
        let result = targets::explain_targets(&self.database).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Guidance ---

    #[tool(description = "Get a personalized recommendation (greeting, calorie and macro advice, goal tips, medical considerations) for the stored profile")]
    fn get_recommendation(&self) -> Result<CallToolResult, McpError> {
        let result = guidance::get_recommendation(&self.database).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get foods to avoid and eat for medical conditions, and warnings for allergies. Uses the profile unless lists are given.")]
    fn get_health_guidance(&self, Parameters(p): Parameters<HealthGuidanceParams>) -> Result<CallToolResult, McpError> {
        let result = guidance::get_health_guidance(&self.database, p.medical_conditions, p.allergies)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Screen food items against the profile's allergies and medical conditions")]
    fn check_allergens(&self, Parameters(p): Parameters<CheckAllergensParams>) -> Result<CallToolResult, McpError> {
        let items = p.items.into_iter().map(AnalyzedFood::from).collect();
        let result = guidance::check_allergens(&self.database, items).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Meals ---

    #[tool(description = "Analyze a meal photo (image_path, image_base64 or image_url) to detect foods with nutrition, allergens and health warnings. Screens against the profile. Set log=true to log the result as a meal.")]
    async fn analyze_meal_photo(&self, Parameters(p): Parameters<AnalyzeMealPhotoParams>) -> Result<CallToolResult, McpError> {
        let input = AnalyzePhotoInput {
            image_path: p.image_path, image_base64: p.image_base64, image_url: p.image_url,
            log: p.log, meal_type: p.meal_type, date: p.date,
        };
        let result = analysis::analyze_meal_photo(&self.database, self.analyzer.as_deref(), input)
            .await
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Suggest meals that fit what is left of the day's calorie and macro targets, respecting the profile's goals, conditions and allergies. Log a chosen suggestion with log_meal.")]
    async fn suggest_meals(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = analysis::suggest_meals(&self.database, self.analyzer.as_deref(), p.date.as_deref())
            .await
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Log a meal with one or more food items. Totals are computed from the items. Returns allergen screening when a profile exists.")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let input = LogMealInput {
            date: p.date, meal_type: p.meal_type, name: p.name, image_ref: p.image_ref, notes: p.notes,
            items: p.items.into_iter().map(|i| MealItemCreate::from(AnalyzedFood::from(i))).collect(),
        };
        let result = meals::log_meal(&self.database, input).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get a meal with all its food items")]
    fn get_meal(&self, Parameters(p): Parameters<MealIdParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_meal(&self.database, p.id).map_err(tool_error)?;
        match result {
            Some(meal) => json_result(&meal),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Meal not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List meals for a date, or the most recent meals when no date is given")]
    fn list_meals(&self, Parameters(p): Parameters<ListMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meals(&self.database, p.date.as_deref(), p.limit).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a meal and its items")]
    fn delete_meal(&self, Parameters(p): Parameters<MealIdParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal(&self.database, p.id).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Water ---

    #[tool(description = "Log glasses of water for a date (negative to undo). Returns the day's total against the goal.")]
    fn log_water(&self, Parameters(p): Parameters<LogWaterParams>) -> Result<CallToolResult, McpError> {
        let result = water::log_water(&self.database, p.glasses, p.date.as_deref()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get water intake for a date against the daily goal")]
    fn get_water(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = water::get_water(&self.database, p.date.as_deref()).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Blood Sugar ---

    #[tool(description = "Log a blood glucose reading in mg/dL. Returns the reading's status (low, normal, elevated, high).")]
    fn log_blood_sugar(&self, Parameters(p): Parameters<LogBloodSugarParams>) -> Result<CallToolResult, McpError> {
        let result = blood_sugar::log_blood_sugar(
            &self.database, p.glucose_mg_dl, p.measurement_type.as_deref(), p.notes, p.logged_at,
        )
        .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List blood glucose readings (recent, or within a date range) with latest and average")]
    fn list_blood_sugar(&self, Parameters(p): Parameters<ListBloodSugarParams>) -> Result<CallToolResult, McpError> {
        let result = blood_sugar::list_blood_sugar(
            &self.database, p.limit, p.start_date.as_deref(), p.end_date.as_deref(),
        )
        .map_err(tool_error)?;
        json_result(&result)
    }

    // --- Medications ---

    #[tool(description = "Add a medication reminder with dosage, frequency and reminder times (HH:MM)")]
    fn add_medication_reminder(&self, Parameters(p): Parameters<AddMedicationReminderParams>) -> Result<CallToolResult, McpError> {
        let result = medications::add_medication_reminder(
            &self.database, &p.name, p.dosage, p.frequency.as_deref(), &p.reminder_times,
        )
        .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List medication reminders")]
    fn list_medication_reminders(&self, Parameters(p): Parameters<ListMedicationRemindersParams>) -> Result<CallToolResult, McpError> {
        let result = medications::list_medication_reminders(&self.database, p.active_only).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Record that a medication dose was taken now")]
    fn mark_medication_taken(&self, Parameters(p): Parameters<MedicationIdParams>) -> Result<CallToolResult, McpError> {
        let result = medications::mark_medication_taken(&self.database, p.id).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Pause (active=false) or resume (active=true) a medication reminder")]
    fn set_medication_active(&self, Parameters(p): Parameters<SetMedicationActiveParams>) -> Result<CallToolResult, McpError> {
        let result = medications::set_medication_active(&self.database, p.id, p.active).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a medication reminder")]
    fn delete_medication_reminder(&self, Parameters(p): Parameters<MedicationIdParams>) -> Result<CallToolResult, McpError> {
        let result = medications::delete_medication_reminder(&self.database, p.id).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Progress ---

    #[tool(description = "Get targets, consumed calories and macros, remaining amounts and water for a date")]
    fn get_daily_summary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = progress::get_daily_summary(&self.database, p.date.as_deref()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get short insights for a date: protein against target, goal tips and a hydration reminder")]
    fn get_insights(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = progress::get_insights(&self.database, p.date.as_deref()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get the meal logging streak (current, longest, total days) and earned badges")]
    fn get_streak(&self) -> Result<CallToolResult, McpError> {
        let result = progress::get_streak(&self.database).map_err(tool_error)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriLensService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilens".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriLens".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriLens - personalized nutrition targets, meal photo analysis and daily health logs. \
                 IMPORTANT: Call nutrition_instructions first. Most tools need a profile (set_profile). \
                 Profile: get/set/update_profile. \
                 Targets: calculate_targets (no profile needed), get_my_targets, explain_targets. \
                 Guidance: get_recommendation, get_health_guidance, check_allergens. \
                 Meals: analyze_meal_photo, suggest_meals, log_meal, get_meal, list_meals, delete_meal. \
                 Always tell the user about allergen alerts before logging. \
                 Water: log_water, get_water. Blood sugar: log_blood_sugar, list_blood_sugar. \
                 Medications: add/list/delete_medication_reminder, mark_medication_taken, set_medication_active. \
                 Progress: get_daily_summary, get_insights, get_streak."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_item_param_defaults() {
        let p: FoodItemParam = serde_json::from_str(r#"{"name": "Apple", "calories": 95}"#).unwrap();
        assert_eq!(p.portion, "1 serving");
        assert_eq!(p.confidence, 1.0);

        let food = AnalyzedFood::from(p);
        assert_eq!(food.nutrition, Nutrition::new(95.0, 0.0, 0.0, 0.0));
        assert!(food.allergens.is_empty());
    }

    #[test]
    fn test_set_profile_param_defaults() {
        let p: SetProfileParams = serde_json::from_str(
            r#"{"first_name": "Ana", "gender": "female", "height_cm": 160, "weight_kg": 55, "age_years": 31}"#,
        )
        .unwrap();
        assert!(p.complete_onboarding);
        assert!(p.notifications_enabled);
        assert!(p.goals.is_empty());
    }

    #[test]
    fn test_service_lists_every_tool() {
        let config = Config::from_lookup(|_| None);
        let service = NutriLensService::new(&config, Database::in_memory().unwrap(), None);
        let names: Vec<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        for expected in [
            "nutrilens_status",
            "analyze_meal_photo",
            "suggest_meals",
            "get_insights",
            "get_streak",
            "explain_targets",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }
        assert_eq!(names.len(), 29);
    }
}
