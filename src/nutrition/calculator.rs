//! Nutrition target calculations
//!
//! Deterministic pipeline from gender, biometrics and goal tags to daily
//! targets: BMR (Mifflin-St Jeor), TDEE, goal-adjusted calories, macro grams
//! and water glasses. Every function is total; degenerate inputs (zero or
//! negative weight, for example) produce degenerate numbers rather than errors.
//!
//! # References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy
//!   expenditure. *American Journal of Clinical Nutrition*, 51(2), 241-247.

use serde::{Deserialize, Serialize};

use super::goals::{self, has_tag};

/// Calories per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Calories per gram of carbohydrate
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Calories per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Daily calorie floor applied after the goal adjustment
pub const MIN_TARGET_CALORIES: i64 = 1200;

/// Daily calorie deficit for weight loss (~0.5 kg/week)
pub const WEIGHT_LOSS_ADJUSTMENT: i64 = -500;
/// Daily calorie surplus for lean muscle gain
pub const MUSCLE_GAIN_ADJUSTMENT: i64 = 300;

/// Water per kg of body weight (ml)
pub const WATER_ML_PER_KG: f64 = 33.0;
/// One glass of water (ml)
pub const ML_PER_GLASS: f64 = 250.0;
pub const MIN_WATER_GLASSES: u32 = 6;
pub const MAX_WATER_GLASSES: u32 = 12;

/// Gender input to the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }

    /// Constant term of the Mifflin-St Jeor equation
    fn bmr_constant(&self) -> f64 {
        match self {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        }
    }
}

/// Body measurements used by every calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Biometrics {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: f64,
}

impl Biometrics {
    pub fn new(height_cm: f64, weight_kg: f64, age_years: f64) -> Self {
        Self {
            height_cm,
            weight_kg,
            age_years,
        }
    }

    /// True when every measurement is strictly positive and finite
    pub fn is_valid(&self) -> bool {
        [self.height_cm, self.weight_kg, self.age_years]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Activity level for TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// 1-3 days/week
    Light,
    /// 3-5 days/week
    Moderate,
    /// 6-7 days/week
    Active,
    /// Very hard exercise or a physical job
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::Light => "1-3 days/week",
            ActivityLevel::Moderate => "3-5 days/week",
            ActivityLevel::Active => "6-7 days/week",
            ActivityLevel::VeryActive => "Very hard exercise/physical job",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Some(ActivityLevel::Light),
            "moderate" | "moderately_active" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very_active" | "veryactive" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }
}

impl Default for ActivityLevel {
    fn default() -> Self {
        ActivityLevel::Moderate
    }
}

/// Fractions of target calories assigned to each macronutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MacroSplit {
    const fn new(protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            protein,
            carbs,
            fats,
        }
    }
}

/// Daily macronutrient targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fats_g: i64,
}

impl MacroTargets {
    /// Calories represented by these grams
    pub fn calories(&self) -> i64 {
        self.protein_g * KCAL_PER_G_PROTEIN as i64
            + self.carbs_g * KCAL_PER_G_CARBS as i64
            + self.fats_g * KCAL_PER_G_FAT as i64
    }
}

/// Complete set of daily targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTargets {
    /// Basal metabolic rate, rounded (kcal/day)
    pub bmr: i64,
    /// Total daily energy expenditure (kcal/day)
    pub tdee: i64,
    /// Goal-adjusted calorie target (kcal/day)
    pub target_calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fats_g: i64,
    /// 250 ml glasses per day
    pub water_glasses: u32,
}

impl NutritionTargets {
    pub fn macros(&self) -> MacroTargets {
        MacroTargets {
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fats_g: self.fats_g,
        }
    }
}

/// BMI classification bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// BMI value with its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiReport {
    pub bmi: f64,
    pub category: BmiCategory,
}

/// Round half up, matching the conventional `Math.round` behavior for
/// negative halves as well (-2.5 rounds to -2).
pub(crate) fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        (floor as i64).saturating_add(1)
    } else {
        floor as i64
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Basal Metabolic Rate using the Mifflin-St Jeor equation (kcal/day)
///
/// - male: `10 * weight_kg + 6.25 * height_cm - 5 * age + 5`
/// - female: `10 * weight_kg + 6.25 * height_cm - 5 * age - 161`
///
/// Not rounded.
pub fn calculate_bmr(gender: Gender, biometrics: &Biometrics) -> f64 {
    10.0 * biometrics.weight_kg + 6.25 * biometrics.height_cm - 5.0 * biometrics.age_years
        + gender.bmr_constant()
}

/// Total Daily Energy Expenditure: BMR times the activity multiplier, rounded
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> i64 {
    round_half_up(bmr * activity_level.multiplier())
}

/// Calorie adjustment implied by the goal tags
///
/// Checks run in a fixed order and assign sequentially: weight_loss adds
/// -500, muscle_gain adds +300, and maintain_weight then resets the total to
/// zero whatever came before.
pub fn goal_adjustment<S: AsRef<str>>(goals: &[S]) -> i64 {
    let mut adjustment = 0;

    if has_tag(goals, goals::WEIGHT_LOSS) {
        adjustment += WEIGHT_LOSS_ADJUSTMENT;
    }
    if has_tag(goals, goals::MUSCLE_GAIN) {
        adjustment += MUSCLE_GAIN_ADJUSTMENT;
    }
    if has_tag(goals, goals::MAINTAIN_WEIGHT) {
        adjustment = 0;
    }

    adjustment
}

/// Goal-adjusted daily calories, never below 1200
pub fn calculate_target_calories<S: AsRef<str>>(tdee: i64, goals: &[S]) -> i64 {
    tdee.saturating_add(goal_adjustment(goals)).max(MIN_TARGET_CALORIES)
}

/// Macro split for the goals; the first matching override wins
pub fn macro_split<S: AsRef<str>>(goals: &[S]) -> MacroSplit {
    if has_tag(goals, goals::MUSCLE_GAIN) {
        MacroSplit::new(0.35, 0.40, 0.25)
    } else if has_tag(goals, goals::WEIGHT_LOSS) {
        MacroSplit::new(0.35, 0.35, 0.30)
    } else if has_tag(goals, goals::DIABETES_MANAGEMENT) {
        MacroSplit::new(0.30, 0.30, 0.40)
    } else {
        MacroSplit::new(0.30, 0.40, 0.30)
    }
}

/// Macronutrient grams for a calorie target
///
/// Each macro is rounded on its own; the grams are not renormalized, so
/// their calorie sum can drift a few kcal from the target. `gender` does not
/// change the split today.
pub fn calculate_macros<S: AsRef<str>>(
    target_calories: i64,
    goals: &[S],
    _gender: Gender,
) -> MacroTargets {
    let split = macro_split(goals);
    let kcal = target_calories as f64;

    MacroTargets {
        protein_g: round_half_up(kcal * split.protein / KCAL_PER_G_PROTEIN),
        carbs_g: round_half_up(kcal * split.carbs / KCAL_PER_G_CARBS),
        fats_g: round_half_up(kcal * split.fats / KCAL_PER_G_FAT),
    }
}

/// Daily water target in 250 ml glasses, clamped to 6..=12
pub fn water_glasses(weight_kg: f64) -> u32 {
    let glasses = round_half_up(weight_kg * WATER_ML_PER_KG / ML_PER_GLASS);
    glasses.clamp(MIN_WATER_GLASSES as i64, MAX_WATER_GLASSES as i64) as u32
}

/// Run the whole pipeline: BMR, TDEE (moderate), calories, macros, water
pub fn calculate_nutrition_targets<S: AsRef<str>>(
    gender: Gender,
    biometrics: &Biometrics,
    goals: &[S],
) -> NutritionTargets {
    let bmr = calculate_bmr(gender, biometrics);
    let tdee = calculate_tdee(bmr, ActivityLevel::Moderate);
    let target_calories = calculate_target_calories(tdee, goals);
    let macros = calculate_macros(target_calories, goals, gender);

    NutritionTargets {
        bmr: round_half_up(bmr),
        tdee,
        target_calories,
        protein_g: macros.protein_g,
        carbs_g: macros.carbs_g,
        fats_g: macros.fats_g,
        water_glasses: water_glasses(biometrics.weight_kg),
    }
}

// ============================================================================
// BMI
// ============================================================================

/// Body mass index: weight / height(m)^2
pub fn calculate_bmi(biometrics: &Biometrics) -> f64 {
    let height_m = biometrics.height_cm / 100.0;
    biometrics.weight_kg / (height_m * height_m)
}

pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

pub fn bmi_report(biometrics: &Biometrics) -> BmiReport {
    let bmi = calculate_bmi(biometrics);
    BmiReport {
        bmi: (bmi * 10.0).round() / 10.0,
        category: bmi_category(bmi),
    }
}
