//! Guidance MCP Tools
//!
//! Recommendation text, condition and allergen guidance, and allergen checks
//! for the stored profile.

use serde::Serialize;

use super::require_profile;
use crate::analysis::AnalyzedFood;
use crate::db::Database;
use crate::guidance::{
    generate_recommendation, health_guidance, screen_items, HealthGuidance,
    PersonalizedRecommendation, ScreeningReport,
};
use crate::nutrition::NutritionTargets;

/// Response for get_recommendation
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendation: PersonalizedRecommendation,
    pub targets: NutritionTargets,
}

/// Response for check_allergens
#[derive(Debug, Serialize)]
pub struct CheckAllergensResponse {
    pub items_checked: usize,
    pub safe: bool,
    pub screening: ScreeningReport,
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Personalized recommendation for the stored profile
pub fn get_recommendation(db: &Database) -> Result<RecommendationResponse, String> {
    let profile = require_profile(db)?;
    let biometrics = profile.biometrics();

    let recommendation = generate_recommendation(
        &profile.first_name,
        profile.gender(),
        &biometrics,
        &profile.goals,
        &profile.medical_conditions,
        &profile.allergies,
    );
    let targets = crate::nutrition::calculate_nutrition_targets(
        profile.gender(),
        &biometrics,
        &profile.goals,
    );

    Ok(RecommendationResponse {
        recommendation,
        targets,
    })
}

/// Condition and allergen guidance, for the profile or for explicit tags
pub fn get_health_guidance(
    db: &Database,
    conditions: Option<Vec<String>>,
    allergies: Option<Vec<String>>,
) -> Result<HealthGuidance, String> {
    if conditions.is_none() && allergies.is_none() {
        let profile = require_profile(db)?;
        return Ok(health_guidance(&profile.medical_conditions, &profile.allergies));
    }

    Ok(health_guidance(
        &conditions.unwrap_or_default(),
        &allergies.unwrap_or_default(),
    ))
}

/// Screen foods against the profile's allergies and conditions
pub fn check_allergens(
    db: &Database,
    items: Vec<AnalyzedFood>,
) -> Result<CheckAllergensResponse, String> {
    if items.is_empty() {
        return Err("At least one food item is required".to_string());
    }

    let profile = require_profile(db)?;
    let screening = screen_items(&items, &profile.allergies, &profile.medical_conditions);

    Ok(CheckAllergensResponse {
        items_checked: items.len(),
        safe: screening.is_clear(),
        screening,
    })
}
