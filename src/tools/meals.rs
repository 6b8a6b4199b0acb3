//! Meal MCP Tools
//!
//! Tools for logging, viewing and deleting meals.

use serde::Serialize;
use tracing::info;

use super::{format_date, resolve_date};
use crate::db::Database;
use crate::guidance::{screen_items, ScreeningReport};
use crate::models::{Meal, MealCreate, MealItemCreate, MealSummary, MealType, Nutrition, UserProfile};

/// Input for log_meal
#[derive(Debug, Clone, Default)]
pub struct LogMealInput {
    pub date: Option<String>,
    pub meal_type: Option<String>,
    pub name: Option<String>,
    pub image_ref: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<MealItemCreate>,
}

/// Response for log_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub meal: Meal,
    /// Allergen and condition screening, when a profile exists
    pub screening: Option<ScreeningReport>,
    pub day_totals: Nutrition,
}

/// Response for list_meals
#[derive(Debug, Serialize)]
pub struct ListMealsResponse {
    pub date: Option<String>,
    pub meals: Vec<MealSummary>,
    pub total: usize,
    pub totals: Nutrition,
}

/// Response for delete_meal
#[derive(Debug, Serialize)]
pub struct DeleteMealResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn validate_item(item: &MealItemCreate) -> Result<(), String> {
    if item.name.trim().is_empty() {
        return Err("Food item name cannot be empty".to_string());
    }
    let n = &item.nutrition;
    if [n.calories, n.protein, n.carbs, n.fat]
        .iter()
        .any(|v| !v.is_finite() || *v < 0.0)
    {
        return Err(format!(
            "Nutrition values for '{}' must be zero or positive",
            item.name
        ));
    }
    Ok(())
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Log a meal with its items
pub fn log_meal(db: &Database, input: LogMealInput) -> Result<LogMealResponse, String> {
    if input.items.is_empty() {
        return Err("A meal needs at least one food item".to_string());
    }
    for item in &input.items {
        validate_item(item)?;
    }
    let date = format_date(resolve_date(input.date.as_deref())?);

    let data = MealCreate {
        date: date.clone(),
        meal_type: input
            .meal_type
            .as_deref()
            .map(MealType::from_str)
            .unwrap_or(MealType::Unspecified),
        name: input.name.filter(|n| !n.trim().is_empty()),
        image_ref: input.image_ref,
        notes: input.notes,
        items: input.items,
        totals: None,
    };

    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meal = Meal::create(&mut conn, &data).map_err(|e| format!("Failed to log meal: {}", e))?;

    let day_totals = Meal::day_totals(&conn, &date)
        .map_err(|e| format!("Failed to total meals: {}", e))?;

    let profile =
        UserProfile::get(&conn).map_err(|e| format!("Failed to load profile: {}", e))?;
    let screening = profile
        .map(|p| screen_items(&meal.items, &p.allergies, &p.medical_conditions))
        .filter(|s| !s.is_clear());

    info!(
        "Logged {} with {} item(s), {:.0} kcal",
        meal.meal_type.as_str(),
        meal.items.len(),
        meal.totals.calories
    );

    Ok(LogMealResponse {
        meal,
        screening,
        day_totals: day_totals.rounded(),
    })
}

/// Get a meal with its items
pub fn get_meal(db: &Database, id: i64) -> Result<Option<Meal>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Meal::get_by_id(&conn, id).map_err(|e| format!("Failed to get meal: {}", e))
}

/// Meals for a date, or the most recent meals when no date is given
pub fn list_meals(
    db: &Database,
    date: Option<&str>,
    limit: Option<i64>,
) -> Result<ListMealsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (date, meals) = match date {
        Some(d) => {
            let d = format_date(resolve_date(Some(d))?);
            let meals = Meal::list_for_date(&conn, &d)
                .map_err(|e| format!("Failed to list meals: {}", e))?;
            (Some(d), meals)
        }
        None => {
            let meals = Meal::list_recent(&conn, limit.unwrap_or(20).clamp(1, 200))
                .map_err(|e| format!("Failed to list meals: {}", e))?;
            (None, meals)
        }
    };

    let totals: Nutrition = meals.iter().map(|m| m.totals).sum();
    let total = meals.len();

    Ok(ListMealsResponse {
        date,
        meals,
        total,
        totals: totals.rounded(),
    })
}

/// Delete a meal
pub fn delete_meal(db: &Database, id: i64) -> Result<DeleteMealResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Meal::delete(&conn, id).map_err(|e| format!("Failed to delete meal: {}", e))?;
    if !deleted {
        return Err(format!("Meal not found with id: {}", id));
    }

    Ok(DeleteMealResponse {
        success: true,
        deleted_id: id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileData;
    use crate::nutrition::{ActivityLevel, Gender};

    fn item(name: &str, calories: f64, allergens: &[&str]) -> MealItemCreate {
        MealItemCreate {
            name: name.into(),
            confidence: 1.0,
            portion: "1 serving".into(),
            nutrition: Nutrition::new(calories, 5.0, 10.0, 2.0),
            allergens: allergens.iter().map(|s| s.to_string()).collect(),
            health_warnings: vec![],
        }
    }

    #[test]
    fn test_log_and_list() {
        let db = Database::in_memory().unwrap();
        let response = log_meal(
            &db,
            LogMealInput {
                date: Some("2026-10-19".into()),
                meal_type: Some("breakfast".into()),
                items: vec![item("Oats", 300.0, &[]), item("Milk", 120.0, &["dairy"])],
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(response.meal.meal_type, MealType::Breakfast);
        assert_eq!(response.meal.totals.calories, 420.0);
        assert_eq!(response.day_totals.calories, 420.0);
        assert!(response.screening.is_none());

        let listed = list_meals(&db, Some("2026-10-19"), None).unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.meals[0].item_count, 2);

        let recent = list_meals(&db, None, Some(5)).unwrap();
        assert_eq!(recent.total, 1);
        assert!(recent.date.is_none());
    }

    #[test]
    fn test_log_meal_screens_against_profile() {
        let db = Database::in_memory().unwrap();
        {
            let conn = db.get_conn().unwrap();
            UserProfile::upsert(
                &conn,
                &ProfileData {
                    first_name: "Jo".into(),
                    last_name: String::new(),
                    email: None,
                    gender: Gender::Female,
                    height_cm: 160.0,
                    weight_kg: 55.0,
                    age_years: 28,
                    activity_level: ActivityLevel::Moderate,
                    goals: vec![],
                    medical_conditions: vec![],
                    allergies: vec!["Dairy".into()],
                    water_goal_glasses: None,
                    notifications_enabled: true,
                },
            )
            .unwrap();
        }

        let response = log_meal(
            &db,
            LogMealInput {
                items: vec![item("Latte", 150.0, &["dairy"])],
                ..Default::default()
            },
        )
        .unwrap();

        let screening = response.screening.unwrap();
        assert_eq!(screening.allergen_summary.as_deref(), Some("Latte may contain: dairy"));
    }

    #[test]
    fn test_log_meal_validation() {
        let db = Database::in_memory().unwrap();
        assert!(log_meal(&db, LogMealInput::default()).is_err());

        let bad_date = LogMealInput {
            date: Some("yesterday".into()),
            items: vec![item("Oats", 300.0, &[])],
            ..Default::default()
        };
        assert!(log_meal(&db, bad_date).unwrap_err().contains("Invalid date"));

        let negative = LogMealInput {
            items: vec![item("Oats", -1.0, &[])],
            ..Default::default()
        };
        assert!(log_meal(&db, negative).is_err());
    }

    #[test]
    fn test_delete_meal() {
        let db = Database::in_memory().unwrap();
        let logged = log_meal(
            &db,
            LogMealInput {
                items: vec![item("Soup", 200.0, &[])],
                ..Default::default()
            },
        )
        .unwrap();

        assert!(delete_meal(&db, logged.meal.id).unwrap().success);
        assert!(get_meal(&db, logged.meal.id).unwrap().is_none());
        assert!(delete_meal(&db, logged.meal.id).is_err());
    }
}
