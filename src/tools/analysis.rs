//! Meal Photo and Suggestion MCP Tools
//!
//! Sends a photo to the food analysis endpoint, screens the detected foods
//! against the profile and optionally logs them as a meal. Also asks the same
//! backend for meals that fit what is left of the day's targets.

use serde::Serialize;
use tracing::info;

use super::meals::{log_meal, LogMealInput};
use super::progress::get_daily_summary;
use super::require_profile;
use crate::analysis::{
    AnalysisError, AnalysisResult, FoodAnalyzer, ImageSource, MealSuggestion,
    MealSuggestionRequest,
};
use crate::db::Database;
use crate::guidance::{screen_items, ScreeningReport};
use crate::models::{Meal, MealItemCreate, Nutrition, UserProfile};

/// Photo analysis arguments
#[derive(Debug, Clone, Default)]
pub struct AnalyzePhotoInput {
    pub image_path: Option<String>,
    pub image_base64: Option<String>,
    pub image_url: Option<String>,
    /// Store the detected foods as a meal
    pub log: bool,
    pub meal_type: Option<String>,
    pub date: Option<String>,
}

/// Response for analyze_meal_photo
#[derive(Debug, Serialize)]
pub struct AnalyzePhotoResponse {
    pub analysis: AnalysisResult,
    pub calorie_summary: String,
    /// Present when a profile exists
    pub screening: Option<ScreeningReport>,
    pub logged_meal: Option<Meal>,
}

/// Response for suggest_meals
#[derive(Debug, Serialize)]
pub struct SuggestMealsResponse {
    pub date: String,
    /// What was sent to the backend, floored at zero
    pub remaining: Nutrition,
    pub suggestions: Vec<MealSuggestion>,
}

fn load_profile(db: &Database) -> Result<Option<UserProfile>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    UserProfile::get(&conn).map_err(|e| format!("Failed to load profile: {}", e))
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Analyze a meal photo
pub async fn analyze_meal_photo(
    db: &Database,
    analyzer: Option<&dyn FoodAnalyzer>,
    input: AnalyzePhotoInput,
) -> Result<AnalyzePhotoResponse, String> {
    let analyzer = analyzer.ok_or_else(|| AnalysisError::NotConfigured.to_string())?;
    let source = ImageSource::from_parts(input.image_path, input.image_base64, input.image_url)
        .map_err(|e| e.to_string())?;
    let image_ref = source.reference();

    let analysis = analyzer
        .analyze(source)
        .await
        .map_err(|e| format!("Analysis failed: {}", e))?;
    info!(
        "Analysis from {} found {} item(s)",
        analysis.provider,
        analysis.food_items.len()
    );

    let screening = load_profile(db)?
        .map(|p| screen_items(&analysis.food_items, &p.allergies, &p.medical_conditions));

    let logged_meal = if input.log {
        if analysis.is_empty() {
            return Err("No food was detected in the photo, so nothing was logged".to_string());
        }
        let logged = log_meal(
            db,
            LogMealInput {
                date: input.date,
                meal_type: input.meal_type,
                name: None,
                image_ref,
                notes: None,
                items: analysis
                    .food_items
                    .iter()
                    .cloned()
                    .map(MealItemCreate::from)
                    .collect(),
            },
        )?;
        Some(logged.meal)
    } else {
        None
    };

    Ok(AnalyzePhotoResponse {
        calorie_summary: analysis.calorie_summary(),
        analysis,
        screening,
        logged_meal,
    })
}

/// Meal ideas for what is left of a day's targets
pub async fn suggest_meals(
    db: &Database,
    analyzer: Option<&dyn FoodAnalyzer>,
    date: Option<&str>,
) -> Result<SuggestMealsResponse, String> {
    let analyzer = analyzer.ok_or_else(|| AnalysisError::NotConfigured.to_string())?;

    let profile = require_profile(db)?;
    let summary = get_daily_summary(db, date)?;
    let remaining = summary
        .remaining
        .ok_or_else(|| "No targets for this day".to_string())?;

    let mut request = MealSuggestionRequest::from_remaining(&remaining);
    request.goals = profile.goals;
    request.medical_conditions = profile.medical_conditions;
    request.allergies = profile.allergies;

    let suggestions = analyzer
        .suggest_meals(&request)
        .await
        .map_err(|e| format!("Meal suggestions failed: {}", e))?;

    Ok(SuggestMealsResponse {
        date: summary.date,
        remaining: Nutrition::new(
            request.remaining_calories,
            request.remaining_protein,
            request.remaining_carbs,
            request.remaining_fats,
        ),
        suggestions: suggestions.suggestions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzedFood, MealSuggestions};
    use crate::models::ProfileData;
    use crate::nutrition::{ActivityLevel, Gender};
    use async_trait::async_trait;

    struct StubAnalyzer;

    #[async_trait]
    impl FoodAnalyzer for StubAnalyzer {
        async fn analyze(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
            assert!(matches!(source, ImageSource::Url(_)));
            Ok(AnalysisResult {
                provider: "stub".into(),
                food_items: vec![AnalyzedFood {
                    name: "Peanut noodles".into(),
                    nutrition: Nutrition::new(540.0, 18.0, 70.0, 22.0),
                    allergens: vec!["peanuts".into()],
                    ..AnalyzedFood::default()
                }],
                total_nutrition: Nutrition::new(540.0, 18.0, 70.0, 22.0),
            })
        }

        async fn suggest_meals(
            &self,
            request: &MealSuggestionRequest,
        ) -> Result<MealSuggestions, AnalysisError> {
            // Echo the request back so tests can see what was sent
            Ok(MealSuggestions {
                suggestions: vec![MealSuggestion {
                    name: format!("{} kcal bowl", request.remaining_calories),
                    description: request.allergies.join(","),
                    calories: request.remaining_calories,
                    protein: request.remaining_protein,
                    ingredients: request.goals.clone(),
                    ..MealSuggestion::default()
                }],
            })
        }
    }

    fn url_input(log: bool) -> AnalyzePhotoInput {
        AnalyzePhotoInput {
            image_url: Some("https://example.com/lunch.jpg".into()),
            log,
            meal_type: Some("lunch".into()),
            date: Some("2026-10-19".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_not_configured() {
        let db = Database::in_memory().unwrap();
        let err = analyze_meal_photo(&db, None, url_input(false)).await.unwrap_err();
        assert!(err.contains("not configured"));
    }

    #[tokio::test]
    async fn test_requires_one_image() {
        let db = Database::in_memory().unwrap();
        let err = analyze_meal_photo(&db, Some(&StubAnalyzer), AnalyzePhotoInput::default())
            .await
            .unwrap_err();
        assert!(!err.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_and_log() {
        let db = Database::in_memory().unwrap();

        let response = analyze_meal_photo(&db, Some(&StubAnalyzer), url_input(true))
            .await
            .unwrap();
        assert_eq!(response.calorie_summary, "540 kcal");
        assert!(response.screening.is_none());

        let meal = response.logged_meal.unwrap();
        assert_eq!(meal.image_ref.as_deref(), Some("https://example.com/lunch.jpg"));
        assert_eq!(meal.items.len(), 1);
        assert_eq!(meal.totals.calories, 540.0);
    }

    fn save_profile(db: &Database) {
        let conn = db.get_conn().unwrap();
        UserProfile::upsert(
            &conn,
            &ProfileData {
                first_name: "Alex".into(),
                last_name: String::new(),
                email: None,
                gender: Gender::Male,
                height_cm: 170.0,
                weight_kg: 70.0,
                age_years: 30,
                activity_level: ActivityLevel::Moderate,
                goals: vec!["weight_loss".into()],
                medical_conditions: vec![],
                allergies: vec!["peanuts".into()],
                water_goal_glasses: None,
                notifications_enabled: true,
            },
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_suggest_meals_needs_backend_and_profile() {
        let db = Database::in_memory().unwrap();
        let err = suggest_meals(&db, None, None).await.unwrap_err();
        assert!(err.contains("not configured"));

        let err = suggest_meals(&db, Some(&StubAnalyzer), None).await.unwrap_err();
        assert!(err.contains("No profile"));
    }

    #[tokio::test]
    async fn test_suggest_meals_sends_remaining_targets() {
        let db = Database::in_memory().unwrap();
        save_profile(&db);

        let response = suggest_meals(&db, Some(&StubAnalyzer), Some("2026-10-19"))
            .await
            .unwrap();
        assert_eq!(response.date, "2026-10-19");
        assert_eq!(response.remaining.calories, 2007.0);
        assert_eq!(response.remaining.protein, 176.0);

        let suggestion = &response.suggestions[0];
        assert_eq!(suggestion.name, "2007 kcal bowl");
        assert_eq!(suggestion.description, "peanuts");
        assert_eq!(suggestion.ingredients, vec!["weight_loss"]);
    }

    #[tokio::test]
    async fn test_suggest_meals_floors_overeaten_targets() {
        let db = Database::in_memory().unwrap();
        save_profile(&db);
        // Over on calories and fat, under on protein and carbs
        let items = vec![MealItemCreate {
            name: "Pasta".into(),
            confidence: 1.0,
            portion: "1 plate".into(),
            nutrition: Nutrition::new(2100.0, 60.0, 250.0, 80.0),
            allergens: vec![],
            health_warnings: vec![],
        }];
        log_meal(
            &db,
            LogMealInput {
                date: Some("2026-10-19".into()),
                meal_type: Some("dinner".into()),
                name: None,
                image_ref: None,
                notes: None,
                items,
            },
        )
        .unwrap();

        let response = suggest_meals(&db, Some(&StubAnalyzer), Some("2026-10-19"))
            .await
            .unwrap();
        assert_eq!(response.remaining.calories, 0.0);
        assert_eq!(response.remaining.fat, 0.0);
        assert_eq!(response.remaining.protein, 116.0);
        assert_eq!(response.suggestions[0].calories, 0.0);
    }
}
