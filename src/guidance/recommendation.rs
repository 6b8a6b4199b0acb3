//! Personalized recommendation text

use serde::Serialize;

use crate::nutrition::calculator::{calculate_nutrition_targets, Biometrics, Gender};
use crate::nutrition::goals::{self, has_tag};

/// Human-readable guidance for a profile
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PersonalizedRecommendation {
    pub greeting: String,
    pub calorie_advice: String,
    pub macro_advice: String,
    pub goal_tips: Vec<String>,
    pub medical_considerations: Vec<String>,
    pub diet_type: String,
}

const GOAL_TIPS: [(&str, [&str; 2]); 5] = [
    (
        goals::WEIGHT_LOSS,
        [
            "Focus on high-fiber foods to stay full longer",
            "Eat protein with every meal to preserve muscle",
        ],
    ),
    (
        goals::MUSCLE_GAIN,
        [
            "Consume protein within 30 minutes after workouts",
            "Spread protein intake across 4-5 meals daily",
        ],
    ),
    (
        goals::ENERGY_BOOST,
        [
            "Include complex carbs for sustained energy",
            "Don't skip breakfast - it fuels your morning",
        ],
    ),
    (
        goals::BETTER_SLEEP,
        [
            "Avoid caffeine after 2 PM",
            "Include magnesium-rich foods like nuts and seeds",
        ],
    ),
    (
        goals::DIABETES_MANAGEMENT,
        [
            "Choose low-glycemic index foods",
            "Monitor portion sizes carefully",
        ],
    ),
];

const DEFAULT_TIPS: [&str; 2] = [
    "Eat a variety of colorful vegetables daily",
    "Stay consistent with meal timing",
];

const CONDITION_NOTES: [(&str, &str); 4] = [
    ("diabetes", "Monitor carbohydrate intake and glycemic index"),
    ("hypertension", "Limit sodium to under 2,300mg daily"),
    (
        "heart_disease",
        "Focus on omega-3 rich foods and limit saturated fats",
    ),
    ("kidney_disease", "Monitor protein and potassium intake"),
];

/// Diet label for the first matching goal
pub fn diet_type<S: AsRef<str>>(goals: &[S]) -> &'static str {
    if has_tag(goals, goals::WEIGHT_LOSS) {
        "Calorie-Controlled Plan"
    } else if has_tag(goals, goals::MUSCLE_GAIN) {
        "High-Protein Muscle Building"
    } else if has_tag(goals, goals::DIABETES_MANAGEMENT) {
        "Low-Glycemic Diet"
    } else if has_tag(goals, goals::HEART_HEALTH) {
        "Heart-Healthy Mediterranean"
    } else {
        "Balanced Nutrition"
    }
}

/// Two tips per matching goal, or two generic tips when none match
pub fn goal_tips<S: AsRef<str>>(goals: &[S]) -> Vec<String> {
    let mut tips: Vec<String> = GOAL_TIPS
        .iter()
        .filter(|(goal, _)| has_tag(goals, goal))
        .flat_map(|(_, tips)| tips.iter().map(|t| t.to_string()))
        .collect();
    if tips.is_empty() {
        tips = DEFAULT_TIPS.iter().map(|t| t.to_string()).collect();
    }
    tips
}

/// One note per recognized condition, then the allergen reminder
pub fn medical_considerations<C: AsRef<str>, A: AsRef<str>>(
    conditions: &[C],
    allergies: &[A],
) -> Vec<String> {
    let mut notes: Vec<String> = CONDITION_NOTES
        .iter()
        .filter(|(condition, _)| has_tag(conditions, condition))
        .map(|(_, note)| note.to_string())
        .collect();

    if !allergies.is_empty() {
        let listed: Vec<&str> = allergies.iter().map(|a| a.as_ref()).collect();
        notes.push(format!("Avoid allergens: {}", listed.join(", ")));
    }
    notes
}

/// Build the full recommendation for a profile
pub fn generate_recommendation<G, C, A>(
    first_name: &str,
    gender: Gender,
    biometrics: &Biometrics,
    goals: &[G],
    conditions: &[C],
    allergies: &[A],
) -> PersonalizedRecommendation
where
    G: AsRef<str>,
    C: AsRef<str>,
    A: AsRef<str>,
{
    let targets = calculate_nutrition_targets(gender, biometrics, goals);

    let name = match first_name.trim() {
        "" => "there",
        n => n,
    };

    let aim = if has_tag(goals, goals::WEIGHT_LOSS) {
        "lose weight safely"
    } else if has_tag(goals, goals::MUSCLE_GAIN) {
        "build lean muscle"
    } else {
        "maintain optimal health"
    };

    PersonalizedRecommendation {
        greeting: format!(
            "Welcome, {}! Your personalized nutrition plan is ready.",
            name
        ),
        calorie_advice: format!(
            "Based on your profile, we recommend {} calories daily to help you {}.",
            targets.target_calories, aim
        ),
        macro_advice: format!(
            "Daily targets: {}g protein, {}g carbs, {}g fats. Aim for {} glasses of water.",
            targets.protein_g, targets.carbs_g, targets.fats_g, targets.water_glasses
        ),
        goal_tips: goal_tips(goals),
        medical_considerations: medical_considerations(conditions, allergies),
        diet_type: diet_type(goals).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_reference_recommendation() {
        let bio = Biometrics::new(170.0, 70.0, 30.0);
        let rec = generate_recommendation(
            "Alex",
            Gender::Male,
            &bio,
            &["weight_loss"],
            &["diabetes", "hypertension"],
            &["peanuts", "dairy"],
        );

        assert_eq!(rec.greeting, "Welcome, Alex! Your personalized nutrition plan is ready.");
        assert_eq!(
            rec.calorie_advice,
            "Based on your profile, we recommend 2007 calories daily to help you lose weight safely."
        );
        assert_eq!(
            rec.macro_advice,
            "Daily targets: 176g protein, 176g carbs, 67g fats. Aim for 9 glasses of water."
        );
        assert_eq!(rec.diet_type, "Calorie-Controlled Plan");
        assert_eq!(rec.goal_tips.len(), 2);
        assert_eq!(
            rec.medical_considerations,
            vec![
                "Monitor carbohydrate intake and glycemic index",
                "Limit sodium to under 2,300mg daily",
                "Avoid allergens: peanuts, dairy",
            ]
        );
    }

    #[test]
    fn test_blank_name_falls_back() {
        let bio = Biometrics::new(165.0, 60.0, 40.0);
        let rec = generate_recommendation("  ", Gender::Female, &bio, &NONE, &NONE, &NONE);
        assert_eq!(rec.greeting, "Welcome, there! Your personalized nutrition plan is ready.");
        assert!(rec.calorie_advice.ends_with("maintain optimal health."));
        assert_eq!(rec.diet_type, "Balanced Nutrition");
        assert_eq!(rec.goal_tips, DEFAULT_TIPS.to_vec());
        assert!(rec.medical_considerations.is_empty());
    }

    #[test]
    fn test_diet_type_priority() {
        assert_eq!(diet_type(&["muscle_gain", "weight_loss"]), "Calorie-Controlled Plan");
        assert_eq!(diet_type(&["heart_health", "muscle_gain"]), "High-Protein Muscle Building");
        assert_eq!(diet_type(&["heart_health", "diabetes_management"]), "Low-Glycemic Diet");
        assert_eq!(diet_type(&["heart_health"]), "Heart-Healthy Mediterranean");
    }

    #[test]
    fn test_goal_tips_follow_fixed_order() {
        let tips = goal_tips(&["diabetes_management", "better_sleep", "weight_loss"]);
        assert_eq!(tips.len(), 6);
        assert_eq!(tips[0], "Focus on high-fiber foods to stay full longer");
        assert_eq!(tips[2], "Avoid caffeine after 2 PM");
        assert_eq!(tips[5], "Monitor portion sizes carefully");
    }

    #[test]
    fn test_medical_considerations_skip_none_condition() {
        let notes = medical_considerations(&["none", "kidney_disease", "asthma"], &NONE);
        assert_eq!(notes, vec!["Monitor protein and potassium intake"]);
    }

    #[test]
    fn test_allergen_sentence_is_verbatim() {
        let notes = medical_considerations(&NONE, &["none"]);
        assert_eq!(notes, vec!["Avoid allergens: none"]);

        let notes = medical_considerations(&NONE, &[" Peanuts ", ""]);
        assert_eq!(notes, vec!["Avoid allergens:  Peanuts , "]);
    }
}
