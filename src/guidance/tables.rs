//! Static health guidance tables
//!
//! Condition guidance (foods to avoid, foods to favor, tips) and allergen
//! warning lists. Lookups are exact on the normalized tag; unknown tags have
//! no entry.

use serde::Serialize;

/// Foods to avoid and favor for a medical condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoodGuidance {
    pub avoid: &'static [&'static str],
    pub eat: &'static [&'static str],
    pub tips: &'static [&'static str],
}

/// Condition keys that have guidance, in display order
pub const CONDITION_KEYS: [&str; 6] = [
    "diabetes",
    "hypertension",
    "heart_disease",
    "kidney_disease",
    "celiac_disease",
    "ibs",
];

/// Allergen keys that have warning lists, in display order
pub const ALLERGEN_KEYS: [&str; 9] = [
    "peanuts",
    "tree_nuts",
    "dairy",
    "eggs",
    "wheat",
    "soy",
    "shellfish",
    "fish",
    "gluten",
];

static DIABETES: FoodGuidance = FoodGuidance {
    avoid: &[
        "White bread & rice",
        "Sugary drinks & sodas",
        "Candy & sweets",
        "Fruit juices",
        "Processed snacks",
        "Honey & syrups",
    ],
    eat: &[
        "Whole grains (quinoa, oats)",
        "Leafy greens & vegetables",
        "Lean proteins (chicken, fish)",
        "Berries (in moderation)",
        "Nuts & seeds",
        "Legumes & beans",
    ],
    tips: &[
        "Monitor carbohydrate intake",
        "Eat smaller, frequent meals",
        "Choose low glycemic index foods",
        "Pair carbs with protein",
    ],
};

static HYPERTENSION: FoodGuidance = FoodGuidance {
    avoid: &[
        "High sodium foods",
        "Processed meats (bacon, deli)",
        "Canned soups & sauces",
        "Fast food",
        "Pickled foods",
        "Salty snacks",
    ],
    eat: &[
        "Bananas (potassium-rich)",
        "Leafy green vegetables",
        "Fatty fish (salmon, mackerel)",
        "Whole grains",
        "Berries & citrus fruits",
        "Low-fat dairy",
    ],
    tips: &[
        "Limit sodium to 2,300mg/day",
        "Follow the DASH diet",
        "Increase potassium intake",
        "Cook at home to control salt",
    ],
};

static HEART_DISEASE: FoodGuidance = FoodGuidance {
    avoid: &[
        "Fried foods",
        "Red meat (limit)",
        "Full-fat dairy",
        "Trans fats",
        "Processed meats",
        "Excess sugar & salt",
    ],
    eat: &[
        "Omega-3 rich fish",
        "Olive oil & avocados",
        "Whole grains & fiber",
        "Colorful vegetables",
        "Nuts (walnuts, almonds)",
        "Beans & legumes",
    ],
    tips: &[
        "Focus on heart-healthy fats",
        "Increase fiber intake",
        "Limit saturated fats",
        "Choose lean proteins",
    ],
};

static KIDNEY_DISEASE: FoodGuidance = FoodGuidance {
    avoid: &[
        "High sodium foods",
        "High potassium fruits (bananas)",
        "Processed foods",
        "Dark colas",
        "Dairy products (limit)",
        "Whole grains (limit phosphorus)",
    ],
    eat: &[
        "Cabbage & cauliflower",
        "Bell peppers",
        "Apples & berries",
        "Egg whites",
        "Fish (limited portions)",
        "Rice & pasta",
    ],
    tips: &[
        "Monitor protein intake",
        "Limit phosphorus & potassium",
        "Control fluid intake if advised",
        "Work with a renal dietitian",
    ],
};

static CELIAC_DISEASE: FoodGuidance = FoodGuidance {
    avoid: &[
        "Wheat products",
        "Barley & rye",
        "Regular bread & pasta",
        "Beer & malt beverages",
        "Some sauces & dressings",
        "Processed foods (check labels)",
    ],
    eat: &[
        "Rice & quinoa",
        "Corn & potatoes",
        "Certified gluten-free oats",
        "Fresh fruits & vegetables",
        "Meat, fish & eggs",
        "Gluten-free grains (buckwheat)",
    ],
    tips: &[
        "Always read food labels",
        "Avoid cross-contamination",
        "Look for certified GF products",
        "Be cautious dining out",
    ],
};

static IBS: FoodGuidance = FoodGuidance {
    avoid: &[
        "High-FODMAP foods",
        "Dairy products (if lactose intolerant)",
        "Beans & lentils",
        "Onions & garlic",
        "Carbonated drinks",
        "Artificial sweeteners",
    ],
    eat: &[
        "Low-FODMAP vegetables",
        "Lean proteins",
        "Bananas & berries",
        "Rice & potatoes",
        "Lactose-free dairy",
        "Eggs",
    ],
    tips: &[
        "Keep a food diary",
        "Eat smaller meals",
        "Stay hydrated",
        "Consider the Low-FODMAP diet",
    ],
};

/// Normalize a user-entered tag: trimmed, lowercase, whitespace runs become `_`
///
/// "Tree Nuts" -> "tree_nuts", " Heart  Disease " -> "heart_disease"
pub fn normalize_tag(tag: &str) -> String {
    tag.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Guidance for a medical condition tag
pub fn condition_guidance(tag: &str) -> Option<&'static FoodGuidance> {
    match normalize_tag(tag).as_str() {
        "diabetes" => Some(&DIABETES),
        "hypertension" => Some(&HYPERTENSION),
        "heart_disease" => Some(&HEART_DISEASE),
        "kidney_disease" => Some(&KIDNEY_DISEASE),
        "celiac_disease" => Some(&CELIAC_DISEASE),
        "ibs" => Some(&IBS),
        _ => None,
    }
}

/// Foods and ingredients likely to contain an allergen
pub fn allergy_warnings(tag: &str) -> Option<&'static [&'static str]> {
    let foods: &'static [&'static str] = match normalize_tag(tag).as_str() {
        "peanuts" => &[
            "Peanut butter & oil",
            "Many Asian dishes",
            "Some candies & chocolates",
            "Baked goods",
            "Ice cream",
            "Sauces (satay, some curries)",
        ],
        "tree_nuts" => &[
            "Almonds, walnuts, cashews",
            "Marzipan & nougat",
            "Pesto sauce",
            "Some cereals",
            "Nut butters & oils",
            "Many desserts",
        ],
        "dairy" => &[
            "Milk & cream",
            "Cheese & butter",
            "Yogurt & ice cream",
            "Many baked goods",
            "Some processed meats",
            "Casein/whey in products",
        ],
        "eggs" => &[
            "Mayonnaise",
            "Many baked goods",
            "Pasta (some types)",
            "Meringue & custards",
            "Some sauces",
            "Egg noodles",
        ],
        "wheat" => &[
            "Bread & pasta",
            "Cereals",
            "Baked goods",
            "Beer",
            "Soy sauce",
            "Some processed foods",
        ],
        "soy" => &[
            "Tofu & tempeh",
            "Soy sauce",
            "Edamame",
            "Many processed foods",
            "Some chocolates",
            "Vegetable oils",
        ],
        "shellfish" => &[
            "Shrimp & lobster",
            "Crab & crayfish",
            "Some fish sauces",
            "Seafood restaurants (cross-contact)",
            "Some supplements",
            "Certain ethnic cuisines",
        ],
        "fish" => &[
            "All fish varieties",
            "Fish sauce",
            "Caesar dressing",
            "Worcestershire sauce",
            "Some Asian dishes",
            "Omega-3 supplements",
        ],
        "gluten" => &[
            "Wheat, barley, rye",
            "Regular bread & pasta",
            "Most cereals",
            "Beer",
            "Many sauces",
            "Processed foods",
        ],
        _ => return None,
    };
    Some(foods)
}

// ============================================================================
// Profile guidance
// ============================================================================

/// Guidance card for one of the user's conditions
#[derive(Debug, Clone, Serialize)]
pub struct ConditionCard {
    /// Tag as the user entered it
    pub condition: String,
    pub key: String,
    pub guidance: FoodGuidance,
}

/// Warning card for one of the user's allergies
#[derive(Debug, Clone, Serialize)]
pub struct AllergyCard {
    pub allergy: String,
    pub key: String,
    pub display_name: String,
    pub warnings: &'static [&'static str],
}

/// All guidance that applies to a profile
#[derive(Debug, Clone, Serialize)]
pub struct HealthGuidance {
    pub conditions: Vec<ConditionCard>,
    pub allergies: Vec<AllergyCard>,
    /// False when nothing in the profile has an entry in the tables
    pub has_guidance: bool,
}

/// Collect the condition and allergy cards for a profile
///
/// Unknown tags are dropped. Tags that normalize to the same key produce a
/// single card, the first one in input order.
pub fn health_guidance<S: AsRef<str>, T: AsRef<str>>(
    conditions: &[S],
    allergies: &[T],
) -> HealthGuidance {
    let mut condition_cards: Vec<ConditionCard> = Vec::new();
    for condition in conditions {
        let condition = condition.as_ref();
        let key = normalize_tag(condition);
        if condition_cards.iter().any(|c| c.key == key) {
            continue;
        }
        if let Some(guidance) = condition_guidance(&key) {
            condition_cards.push(ConditionCard {
                condition: condition.to_string(),
                key,
                guidance: *guidance,
            });
        }
    }

    let mut allergy_cards: Vec<AllergyCard> = Vec::new();
    for allergy in allergies {
        let allergy = allergy.as_ref();
        let key = normalize_tag(allergy);
        if allergy_cards.iter().any(|a| a.key == key) {
            continue;
        }
        if let Some(warnings) = allergy_warnings(&key) {
            allergy_cards.push(AllergyCard {
                allergy: allergy.to_string(),
                display_name: key.replace('_', " "),
                key,
                warnings,
            });
        }
    }

    let has_guidance = !condition_cards.is_empty() || !allergy_cards.is_empty();

    HealthGuidance {
        conditions: condition_cards,
        allergies: allergy_cards,
        has_guidance,
    }
}
