//! Meal screening against a profile
//!
//! Allergen flags on detected foods are matched loosely against the user's
//! allergies, and health warnings are mapped to the conditions they affect.

use serde::Serialize;

use super::tables::normalize_tag;
use crate::analysis::AnalyzedFood;

/// A food carrying allergen flags and health warnings
pub trait FlaggedFood {
    fn food_name(&self) -> &str;
    fn allergen_flags(&self) -> &[String];
    fn health_warnings(&self) -> &[String];
}

impl FlaggedFood for AnalyzedFood {
    fn food_name(&self) -> &str {
        &self.name
    }

    fn allergen_flags(&self) -> &[String] {
        &self.allergens
    }

    fn health_warnings(&self) -> &[String] {
        &self.health_warnings
    }
}

/// Loose allergen match: either normalized string contains the other
///
/// "Tree Nuts" matches "tree_nut"; "dairy" matches "dairy_products".
pub fn allergens_match(a: &str, b: &str) -> bool {
    let a = normalize_tag(a);
    let b = normalize_tag(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Conditions a health warning is relevant to
pub fn conditions_for_warning(warning: &str) -> &'static [&'static str] {
    match normalize_tag(warning).as_str() {
        "high_sugar" | "high_carb" => &["diabetes", "diabetes_management"],
        "high_sodium" => &["hypertension", "high_blood_pressure"],
        "high_fat" => &["heart_disease", "cholesterol"],
        "processed" => &["diabetes", "heart_disease"],
        _ => &[],
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllergenAlert {
    pub food: String,
    /// The food's flags that matched one of the user's allergies
    pub allergens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScreeningReport {
    pub allergen_alerts: Vec<AllergenAlert>,
    /// Health warnings relevant to the user's conditions, e.g. "high sugar"
    pub health_concerns: Vec<String>,
    pub allergen_summary: Option<String>,
    pub health_summary: Option<String>,
}

impl ScreeningReport {
    pub fn is_clear(&self) -> bool {
        self.allergen_alerts.is_empty() && self.health_concerns.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Screen foods against the user's allergies and conditions
pub fn screen_items<F, A, C>(items: &[F], allergies: &[A], conditions: &[C]) -> ScreeningReport
where
    F: FlaggedFood,
    A: AsRef<str>,
    C: AsRef<str>,
{
    let mut allergen_alerts = Vec::new();
    let mut matched_allergens: Vec<String> = Vec::new();

    for item in items {
        let mut flagged: Vec<String> = Vec::new();
        for flag in item.allergen_flags() {
            if allergies.iter().any(|a| allergens_match(flag, a.as_ref())) {
                push_unique(&mut flagged, flag);
                push_unique(&mut matched_allergens, flag);
            }
        }
        if !flagged.is_empty() {
            allergen_alerts.push(AllergenAlert {
                food: item.food_name().to_string(),
                allergens: flagged,
            });
        }
    }

    let user_conditions: Vec<String> = conditions
        .iter()
        .map(|c| normalize_tag(c.as_ref()))
        .collect();

    let mut health_concerns: Vec<String> = Vec::new();
    for warning in items.iter().flat_map(|i| i.health_warnings()) {
        let relevant = conditions_for_warning(warning)
            .iter()
            .any(|cond| user_conditions.iter().any(|u| u == cond));
        if relevant {
            push_unique(&mut health_concerns, &warning.replace('_', " "));
        }
    }

    let allergen_summary = if allergen_alerts.is_empty() {
        None
    } else {
        let foods: Vec<&str> = allergen_alerts.iter().map(|a| a.food.as_str()).collect();
        Some(format!(
            "{} may contain: {}",
            foods.join(", "),
            matched_allergens.join(", ")
        ))
    };

    let health_summary = if health_concerns.is_empty() {
        None
    } else {
        Some(format!(
            "This meal has {} which may affect your health conditions.",
            health_concerns.join(", ")
        ))
    };

    ScreeningReport {
        allergen_alerts,
        health_concerns,
        allergen_summary,
        health_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(name: &str, allergens: &[&str], warnings: &[&str]) -> AnalyzedFood {
        AnalyzedFood {
            name: name.to_string(),
            allergens: allergens.iter().map(|s| s.to_string()).collect(),
            health_warnings: warnings.iter().map(|s| s.to_string()).collect(),
            ..AnalyzedFood::default()
        }
    }

    #[test]
    fn test_allergens_match_loosely() {
        assert!(allergens_match("Tree Nuts", "tree_nut"));
        assert!(allergens_match("tree_nut", "Tree Nuts"));
        assert!(allergens_match("dairy", "Dairy"));
        assert!(allergens_match("shellfish", "fish"));
        assert!(!allergens_match("soy", "wheat"));
        assert!(!allergens_match("", "soy"));
        assert!(!allergens_match("soy", "   "));
    }

    #[test]
    fn test_warning_condition_map() {
        assert_eq!(conditions_for_warning("high_sugar"), &["diabetes", "diabetes_management"]);
        assert_eq!(conditions_for_warning("high_sodium"), &["hypertension", "high_blood_pressure"]);
        assert!(conditions_for_warning("spicy").is_empty());
    }

    #[test]
    fn test_screen_allergens() {
        let items = vec![
            food("Pesto pasta", &["tree_nut", "wheat", "dairy"], &[]),
            food("Side salad", &[], &[]),
            food("Garlic bread", &["wheat"], &[]),
        ];
        let report = screen_items(&items, &["Tree Nuts", "wheat"], &[] as &[&str]);

        assert_eq!(report.allergen_alerts.len(), 2);
        assert_eq!(report.allergen_alerts[0].food, "Pesto pasta");
        assert_eq!(report.allergen_alerts[0].allergens, vec!["tree_nut", "wheat"]);
        assert_eq!(
            report.allergen_summary.as_deref(),
            Some("Pesto pasta, Garlic bread may contain: tree_nut, wheat")
        );
        assert!(report.health_summary.is_none());
    }

    #[test]
    fn test_screen_health_concerns() {
        let items = vec![
            food("Soda", &[], &["high_sugar", "processed"]),
            food("Chips", &[], &["high_sodium", "processed"]),
        ];
        let report = screen_items(&items, &[] as &[&str], &["Diabetes"]);

        assert_eq!(report.health_concerns, vec!["high sugar", "processed"]);
        assert_eq!(
            report.health_summary.as_deref(),
            Some("This meal has high sugar, processed which may affect your health conditions.")
        );
        assert!(report.allergen_alerts.is_empty());
    }

    #[test]
    fn test_clear_when_nothing_matches() {
        let items = vec![food("Apple", &[], &["high_sugar"])];
        let report = screen_items(&items, &["peanuts"], &["ibs"]);
        assert!(report.is_clear());
        assert!(report.allergen_summary.is_none());
    }
}
