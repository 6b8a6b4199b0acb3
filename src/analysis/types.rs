//! Wire format of the food analysis endpoint

use serde::{Deserialize, Serialize};

use crate::models::Nutrition;

/// Request body for `POST /api/analyze-food`
///
/// Exactly one of `image` (base64, with or without a data URL prefix) or
/// `image_url` is sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_name() -> String {
    "Unknown".to_string()
}

fn default_confidence() -> f64 {
    0.5
}

fn default_portion() -> String {
    "1 serving".to_string()
}

fn default_provider() -> String {
    "unknown".to_string()
}

/// One food detected in a photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzedFood {
    #[serde(default = "default_name")]
    pub name: String,
    /// Detector confidence, 0.0 to 1.0
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Estimated portion, e.g. "150g" or "1 cup"
    #[serde(default = "default_portion")]
    pub portion: String,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Flags like high_sugar, high_sodium, processed
    #[serde(default)]
    pub health_warnings: Vec<String>,
}

impl Default for AnalyzedFood {
    fn default() -> Self {
        Self {
            name: default_name(),
            confidence: default_confidence(),
            portion: default_portion(),
            nutrition: Nutrition::zero(),
            allergens: Vec::new(),
            health_warnings: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct RawAnalysisResult {
    #[serde(default = "default_provider")]
    provider: String,
    #[serde(default)]
    food_items: Vec<AnalyzedFood>,
    #[serde(default)]
    total_nutrition: Option<Nutrition>,
}

/// Result of analyzing one photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawAnalysisResult")]
pub struct AnalysisResult {
    pub provider: String,
    pub food_items: Vec<AnalyzedFood>,
    pub total_nutrition: Nutrition,
}

impl From<RawAnalysisResult> for AnalysisResult {
    fn from(raw: RawAnalysisResult) -> Self {
        let total_nutrition = raw
            .total_nutrition
            .unwrap_or_else(|| raw.food_items.iter().map(|f| f.nutrition).sum());
        Self {
            provider: raw.provider,
            food_items: raw.food_items,
            total_nutrition,
        }
    }
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.food_items.is_empty()
    }

    /// e.g. "520 kcal"
    pub fn calorie_summary(&self) -> String {
        format!("{:.0} kcal", self.total_nutrition.calories)
    }
}

/// Request body for `POST /api/suggest-meals`
///
/// Remaining amounts are what is left of the day's targets, never negative.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealSuggestionRequest {
    pub remaining_calories: f64,
    pub remaining_protein: f64,
    pub remaining_carbs: f64,
    pub remaining_fats: f64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub goals: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub medical_conditions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub allergies: Vec<String>,
}

impl MealSuggestionRequest {
    /// Build from remaining amounts, flooring each at zero
    pub fn from_remaining(remaining: &Nutrition) -> Self {
        Self {
            remaining_calories: remaining.calories.max(0.0),
            remaining_protein: remaining.protein.max(0.0),
            remaining_carbs: remaining.carbs.max(0.0),
            remaining_fats: remaining.fat.max(0.0),
            ..Default::default()
        }
    }
}

/// One suggested meal
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MealSuggestion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    /// e.g. "15 min"
    #[serde(default, rename = "prepTime", alias = "prep_time")]
    pub prep_time: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl MealSuggestion {
    pub fn nutrition(&self) -> Nutrition {
        Nutrition::new(self.calories, self.protein, self.carbs, self.fat)
    }
}

impl From<MealSuggestion> for AnalyzedFood {
    fn from(s: MealSuggestion) -> Self {
        Self {
            nutrition: s.nutrition(),
            name: s.name,
            confidence: 1.0,
            ..AnalyzedFood::default()
        }
    }
}

/// Response of `POST /api/suggest-meals`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MealSuggestions {
    #[serde(default)]
    pub suggestions: Vec<MealSuggestion>,
}

/// Error body returned by the endpoint on failure
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
}
