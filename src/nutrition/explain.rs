//! Calculation explanations
//!
//! Builds a step-by-step account of how a set of targets was derived, for
//! showing the user where their numbers come from.

use serde::Serialize;

use super::calculator::{
    calculate_bmr, calculate_macros, calculate_nutrition_targets, calculate_tdee,
    goal_adjustment, macro_split, ActivityLevel, Biometrics, Gender, MacroSplit,
    NutritionTargets, MIN_TARGET_CALORIES, ML_PER_GLASS, MUSCLE_GAIN_ADJUSTMENT,
    WATER_ML_PER_KG, WEIGHT_LOSS_ADJUSTMENT,
};
use super::goals;

#[derive(Debug, Clone, Serialize)]
pub struct BmrStep {
    pub title: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
    pub source: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityMultiplier {
    pub level: &'static str,
    pub value: f64,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TdeeStep {
    pub title: &'static str,
    pub description: &'static str,
    pub multipliers: Vec<ActivityMultiplier>,
    pub level_used: &'static str,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalAdjustmentRule {
    pub goal: &'static str,
    pub value: i64,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalAdjustmentStep {
    pub title: &'static str,
    pub description: &'static str,
    pub adjustments: Vec<GoalAdjustmentRule>,
    pub applied_adjustment: i64,
    pub minimum_calories: i64,
    /// True when the 1200 kcal floor replaced the adjusted value
    pub floor_applied: bool,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MacroStep {
    pub split: MacroSplit,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fats_g: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterStep {
    pub ml_per_kg: f64,
    pub ml_per_glass: f64,
    pub unclamped_glasses: f64,
    pub glasses: u32,
}

/// Full breakdown of a target calculation
#[derive(Debug, Clone, Serialize)]
pub struct CalculationExplanation {
    pub bmr: BmrStep,
    pub tdee: TdeeStep,
    pub goal_adjustment: GoalAdjustmentStep,
    pub macros: MacroStep,
    pub water: WaterStep,
    pub targets: NutritionTargets,
}

const MALE_FORMULA: &str = "(10 × weight kg) + (6.25 × height cm) - (5 × age) + 5";
const FEMALE_FORMULA: &str = "(10 × weight kg) + (6.25 × height cm) - (5 × age) - 161";

fn adjustment_rules() -> Vec<GoalAdjustmentRule> {
    vec![
        GoalAdjustmentRule {
            goal: goals::WEIGHT_LOSS,
            value: WEIGHT_LOSS_ADJUSTMENT,
            label: "~0.5 kg/week loss",
        },
        GoalAdjustmentRule {
            goal: goals::MUSCLE_GAIN,
            value: MUSCLE_GAIN_ADJUSTMENT,
            label: "Lean muscle building",
        },
        GoalAdjustmentRule {
            goal: goals::MAINTAIN_WEIGHT,
            value: 0,
            label: "Maintain current weight",
        },
    ]
}

/// Explain every step of `calculate_nutrition_targets` for these inputs
pub fn explain_targets<S: AsRef<str>>(
    gender: Gender,
    biometrics: &Biometrics,
    goals: &[S],
) -> CalculationExplanation {
    let level = ActivityLevel::Moderate;
    let bmr = calculate_bmr(gender, biometrics);
    let tdee = calculate_tdee(bmr, level);
    let adjustment = goal_adjustment(goals);
    let targets = calculate_nutrition_targets(gender, biometrics, goals);
    let macros = calculate_macros(targets.target_calories, goals, gender);

    let formula = match gender {
        Gender::Male => MALE_FORMULA,
        Gender::Female => FEMALE_FORMULA,
    };

    CalculationExplanation {
        bmr: BmrStep {
            title: "Basal Metabolic Rate (BMR)",
            description: "The calories your body needs at complete rest to maintain basic functions like breathing and circulation.",
            formula,
            source: "Mifflin-St Jeor Equation (most accurate for most people)",
            value: bmr,
        },
        tdee: TdeeStep {
            title: "Total Daily Energy Expenditure (TDEE)",
            description: "Your BMR multiplied by an activity factor to account for daily movement and exercise.",
            multipliers: ActivityLevel::ALL
                .iter()
                .map(|l| ActivityMultiplier {
                    level: l.as_str(),
                    value: l.multiplier(),
                    label: l.label(),
                })
                .collect(),
            level_used: level.as_str(),
            value: tdee,
        },
        goal_adjustment: GoalAdjustmentStep {
            title: "Goal-Based Adjustment",
            description: "Your TDEE adjusted based on your health goals.",
            adjustments: adjustment_rules(),
            applied_adjustment: adjustment,
            minimum_calories: MIN_TARGET_CALORIES,
            floor_applied: tdee.saturating_add(adjustment) < MIN_TARGET_CALORIES,
            value: targets.target_calories,
        },
        macros: MacroStep {
            split: macro_split(goals),
            protein_g: macros.protein_g,
            carbs_g: macros.carbs_g,
            fats_g: macros.fats_g,
        },
        water: WaterStep {
            ml_per_kg: WATER_ML_PER_KG,
            ml_per_glass: ML_PER_GLASS,
            unclamped_glasses: biometrics.weight_kg * WATER_ML_PER_KG / ML_PER_GLASS,
            glasses: targets.water_glasses,
        },
        targets,
    }
}
