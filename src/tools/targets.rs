//! Target MCP Tools
//!
//! Nutrition targets and their explanation, from explicit inputs or from the
//! stored profile.

use serde::Serialize;

use super::profile::{parse_gender, validate_biometrics};
use super::require_profile;
use crate::db::Database;
use crate::guidance::recommendation::diet_type;
use crate::nutrition::{
    bmi_report, calculate_nutrition_targets, explain_targets as explain, macro_split, Biometrics,
    BmiReport, CalculationExplanation, Gender, MacroSplit, NutritionTargets,
};

/// Response for calculate_targets / get_my_targets
#[derive(Debug, Serialize)]
pub struct TargetsResponse {
    pub targets: NutritionTargets,
    pub macro_split: MacroSplit,
    pub bmi: BmiReport,
    pub diet_type: String,
    /// Daily water goal after any profile override
    pub water_goal_glasses: u32,
    pub water_goal_overridden: bool,
}

fn build_targets<S: AsRef<str>>(
    gender: Gender,
    biometrics: &Biometrics,
    goals: &[S],
    water_override: Option<u32>,
) -> TargetsResponse {
    let targets = calculate_nutrition_targets(gender, biometrics, goals);
    TargetsResponse {
        macro_split: macro_split(goals),
        bmi: bmi_report(biometrics),
        diet_type: diet_type(goals).to_string(),
        water_goal_glasses: water_override.unwrap_or(targets.water_glasses),
        water_goal_overridden: water_override.is_some(),
        targets,
    }
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Targets for explicit inputs; nothing is stored
pub fn calculate_targets(
    gender: &str,
    height_cm: f64,
    weight_kg: f64,
    age_years: f64,
    goals: &[String],
) -> Result<TargetsResponse, String> {
    let gender = parse_gender(gender)?;
    let biometrics = Biometrics::new(height_cm, weight_kg, age_years);
    validate_biometrics(&biometrics)?;

    Ok(build_targets(gender, &biometrics, goals, None))
}

/// Targets for the stored profile
pub fn get_my_targets(db: &Database) -> Result<TargetsResponse, String> {
    let profile = require_profile(db)?;
    Ok(build_targets(
        profile.gender(),
        &profile.biometrics(),
        &profile.goals,
        profile.water_goal_glasses,
    ))
}

/// Step-by-step explanation for the stored profile
pub fn explain_targets(db: &Database) -> Result<CalculationExplanation, String> {
    let profile = require_profile(db)?;
    Ok(explain(profile.gender(), &profile.biometrics(), &profile.goals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProfileData, UserProfile};
    use crate::nutrition::ActivityLevel;

    fn store_profile(db: &Database, goals: &[&str], water: Option<u32>) {
        let conn = db.get_conn().unwrap();
        UserProfile::upsert(
            &conn,
            &ProfileData {
                first_name: "Sam".into(),
                last_name: String::new(),
                email: None,
                gender: Gender::Female,
                height_cm: 165.0,
                weight_kg: 60.0,
                age_years: 40,
                activity_level: ActivityLevel::Active,
                goals: goals.iter().map(|g| g.to_string()).collect(),
                medical_conditions: vec![],
                allergies: vec![],
                water_goal_glasses: water,
                notifications_enabled: false,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_calculate_targets_reference() {
        let response = calculate_targets("male", 170.0, 70.0, 30.0, &["weight_loss".to_string()]).unwrap();
        assert_eq!(response.targets.target_calories, 2007);
        assert_eq!(response.targets.protein_g, 176);
        assert_eq!(response.diet_type, "Calorie-Controlled Plan");
        assert_eq!(response.water_goal_glasses, 9);
        assert!(!response.water_goal_overridden);
    }

    #[test]
    fn test_calculate_targets_rejects_bad_input() {
        assert!(calculate_targets("x", 170.0, 70.0, 30.0, &[]).is_err());
        assert!(calculate_targets("female", 170.0, -5.0, 30.0, &[]).is_err());
    }

    #[test]
    fn test_profile_targets_ignore_stored_activity_level() {
        let db = Database::in_memory().unwrap();
        assert!(get_my_targets(&db).is_err());

        store_profile(&db, &[], Some(11));
        let response = get_my_targets(&db).unwrap();

        // 10*60 + 6.25*165 - 5*40 - 161 = 1270.25; x1.55 = 1968.9
        assert_eq!(response.targets.bmr, 1270);
        assert_eq!(response.targets.tdee, 1969);
        assert_eq!(response.water_goal_glasses, 11);
        assert!(response.water_goal_overridden);
        assert_eq!(response.targets.water_glasses, 8);
    }

    #[test]
    fn test_explain_stored_profile() {
        let db = Database::in_memory().unwrap();
        store_profile(&db, &["muscle_gain"], None);

        let explanation = explain_targets(&db).unwrap();
        assert_eq!(explanation.goal_adjustment.applied_adjustment, 300);
        assert_eq!(explanation.targets.target_calories, 1969 + 300);
    }
}
