//! Shared nutrition data structure
//!
//! Used by analyzed food items, stored meal items, meals and daily totals.

use serde::{Deserialize, Serialize};

/// Calories and macronutrients
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64, // grams
    #[serde(default)]
    pub carbs: f64, // grams
    #[serde(default)]
    pub fat: f64, // grams
}

impl Nutrition {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Create a new Nutrition with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
        }
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }

    /// Each value rounded to one decimal place, for display
    pub fn rounded(&self) -> Self {
        fn r(v: f64) -> f64 {
            (v * 10.0).round() / 10.0
        }
        Self {
            calories: r(self.calories),
            protein: r(self.protein),
            carbs: r(self.carbs),
            fat: r(self.fat),
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_and_scale() {
        let items = vec![
            Nutrition::new(200.0, 10.0, 20.0, 5.0),
            Nutrition::new(150.5, 2.5, 30.0, 1.0),
        ];
        let total: Nutrition = items.into_iter().sum();
        assert_eq!(total, Nutrition::new(350.5, 12.5, 50.0, 6.0));

        let half = total * 0.5;
        assert!((half.calories - 175.25).abs() < 1e-9);
        assert_eq!(half.rounded().calories, 175.3);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let n: Nutrition = serde_json::from_str(r#"{"calories": 120}"#).unwrap();
        assert_eq!(n, Nutrition::new(120.0, 0.0, 0.0, 0.0));
    }
}
