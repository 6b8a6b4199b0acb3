//! Health guidance
//!
//! Rule-based advice layered on top of the nutrition targets: recommendation
//! text, condition and allergen tables, and meal screening.

pub mod recommendation;
pub mod screening;
pub mod tables;

pub use recommendation::{generate_recommendation, PersonalizedRecommendation};
pub use screening::{allergens_match, screen_items, FlaggedFood, ScreeningReport};
pub use tables::{
    allergy_warnings, condition_guidance, health_guidance, normalize_tag, FoodGuidance,
    HealthGuidance,
};
