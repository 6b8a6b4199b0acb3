//! Nutrition calculation module
//!
//! Personalized daily targets (BMR, TDEE, calories, macros, water) and
//! explanations of how they were derived.

pub mod calculator;
pub mod explain;
pub mod goals;

pub use calculator::{
    bmi_category, bmi_report, calculate_bmi, calculate_bmr, calculate_macros,
    calculate_nutrition_targets, calculate_target_calories, calculate_tdee, goal_adjustment,
    macro_split, water_glasses, ActivityLevel, Biometrics, BmiCategory, BmiReport, Gender,
    MacroSplit, MacroTargets, NutritionTargets,
};
pub use explain::{explain_targets, CalculationExplanation};
