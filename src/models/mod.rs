//! Data models
//!
//! Rust structs representing database entities.

mod blood_sugar;
mod meal;
mod medication;
mod nutrition;
mod profile;
mod water;

pub use blood_sugar::{
    BloodSugarCreate, BloodSugarReading, BloodSugarStats, GlucoseStatus, MeasurementType,
};
pub use meal::{Meal, MealCreate, MealItem, MealItemCreate, MealSummary, MealType};
pub use medication::{normalize_time, Frequency, MedicationReminder, MedicationReminderCreate};
pub use nutrition::Nutrition;
pub use profile::{clean_tags, ProfileData, ProfileUpdate, UserProfile};
pub use water::WaterLog;
