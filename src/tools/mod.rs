//! NutriLens Tools module
//!
//! MCP tool implementations. Each function takes the database handle and
//! returns a serializable response or an error message.

pub mod analysis;
pub mod blood_sugar;
pub mod guidance;
pub mod meals;
pub mod medications;
pub mod profile;
pub mod progress;
pub mod status;
pub mod targets;
pub mod water;

use chrono::{Local, NaiveDate};

use crate::db::Database;
use crate::models::UserProfile;

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Validate a `YYYY-MM-DD` date, defaulting to today
pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", d)),
        None => Ok(today()),
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The stored profile, or an error telling the caller to create one
pub(crate) fn require_profile(db: &Database) -> Result<UserProfile, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    UserProfile::get(&conn)
        .map_err(|e| format!("Failed to load profile: {}", e))?
        .ok_or_else(|| "No profile found. Use set_profile to create one first.".to_string())
}
