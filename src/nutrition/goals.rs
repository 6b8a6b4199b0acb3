//! Goal tags
//!
//! Goals are free-form string tags chosen during onboarding. Only the tags
//! below change any calculation or advice; anything else is carried along
//! and ignored.

pub const WEIGHT_LOSS: &str = "weight_loss";
pub const MUSCLE_GAIN: &str = "muscle_gain";
pub const MAINTAIN_WEIGHT: &str = "maintain_weight";
pub const DIABETES_MANAGEMENT: &str = "diabetes_management";
pub const HEART_HEALTH: &str = "heart_health";
pub const ENERGY_BOOST: &str = "energy_boost";
pub const BETTER_SLEEP: &str = "better_sleep";

/// Whether `tags` contains `tag` exactly
pub fn has_tag<S: AsRef<str>>(tags: &[S], tag: &str) -> bool {
    tags.iter().any(|t| t.as_ref() == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_tag_is_exact() {
        let goals = vec!["weight_loss".to_string(), "better_sleep".to_string()];
        assert!(has_tag(&goals, WEIGHT_LOSS));
        assert!(has_tag(&goals, BETTER_SLEEP));
        assert!(!has_tag(&goals, MUSCLE_GAIN));
        assert!(!has_tag(&["Weight_Loss"], WEIGHT_LOSS));
    }
}
