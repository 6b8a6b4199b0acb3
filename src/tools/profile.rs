//! Profile MCP Tools
//!
//! Tools for reading and writing the user profile.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{ProfileData, ProfileUpdate, UserProfile};
use crate::nutrition::{
    bmi_report, calculate_nutrition_targets, ActivityLevel, Biometrics, BmiReport, Gender,
    NutritionTargets,
};

/// Profile with the values derived from it
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub bmi: BmiReport,
    pub targets: NutritionTargets,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let biometrics = profile.biometrics();
        let targets = calculate_nutrition_targets(profile.gender(), &biometrics, &profile.goals);
        Self {
            bmi: bmi_report(&biometrics),
            targets,
            profile,
        }
    }
}

/// Raw profile input as received from a tool call
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: u32,
    pub activity_level: Option<String>,
    pub goals: Vec<String>,
    pub medical_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub water_goal_glasses: Option<u32>,
    pub notifications_enabled: bool,
    pub complete_onboarding: bool,
}

pub(crate) fn parse_gender(gender: &str) -> Result<Gender, String> {
    Gender::from_str(gender)
        .ok_or_else(|| format!("Invalid gender '{}': expected 'male' or 'female'", gender))
}

pub(crate) fn parse_activity_level(level: &str) -> Result<ActivityLevel, String> {
    ActivityLevel::from_str(level).ok_or_else(|| {
        format!(
            "Invalid activity level '{}': expected sedentary, light, moderate, active or very_active",
            level
        )
    })
}

pub(crate) fn validate_biometrics(biometrics: &Biometrics) -> Result<(), String> {
    if biometrics.is_valid() {
        Ok(())
    } else {
        Err("Height, weight and age must all be greater than 0".to_string())
    }
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Get the stored profile
pub fn get_profile(db: &Database) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile =
        UserProfile::get(&conn).map_err(|e| format!("Failed to load profile: {}", e))?;

    Ok(profile.map(ProfileResponse::from))
}

/// Create or replace the profile
pub fn set_profile(db: &Database, input: ProfileInput) -> Result<ProfileResponse, String> {
    let gender = parse_gender(&input.gender)?;
    let activity_level = match input.activity_level.as_deref() {
        Some(level) => parse_activity_level(level)?,
        None => ActivityLevel::default(),
    };
    validate_biometrics(&Biometrics::new(
        input.height_cm,
        input.weight_kg,
        input.age_years as f64,
    ))?;

    let data = ProfileData {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        gender,
        height_cm: input.height_cm,
        weight_kg: input.weight_kg,
        age_years: input.age_years,
        activity_level,
        goals: input.goals,
        medical_conditions: input.medical_conditions,
        allergies: input.allergies,
        water_goal_glasses: input.water_goal_glasses,
        notifications_enabled: input.notifications_enabled,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let mut profile =
        UserProfile::upsert(&conn, &data).map_err(|e| format!("Failed to save profile: {}", e))?;

    if input.complete_onboarding && !profile.onboarding_completed {
        if let Some(p) = UserProfile::complete_onboarding(&conn)
            .map_err(|e| format!("Failed to complete onboarding: {}", e))?
        {
            profile = p;
        }
    }

    info!("Profile saved for {}", profile.full_name());
    Ok(ProfileResponse::from(profile))
}

/// Update individual profile fields
pub fn update_profile(db: &Database, data: ProfileUpdate) -> Result<ProfileResponse, String> {
    for value in [data.height_cm, data.weight_kg].into_iter().flatten() {
        if !(value.is_finite() && value > 0.0) {
            return Err("Height and weight must be greater than 0".to_string());
        }
    }
    if data.age_years == Some(0) {
        return Err("Age must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = UserProfile::update(&conn, &data)
        .map_err(|e| format!("Failed to update profile: {}", e))?;

    match updated {
        Some(profile) => Ok(ProfileResponse::from(profile)),
        None => Err("No profile found. Use set_profile to create one first.".to_string()),
    }
}
