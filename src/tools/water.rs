//! Water MCP Tools

use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use super::{format_date, resolve_date};
use crate::db::Database;
use crate::models::{UserProfile, WaterLog};
use crate::nutrition::calculate_nutrition_targets;

/// Goal used when no profile exists yet
pub const DEFAULT_WATER_GOAL: u32 = 8;

/// Response for log_water / get_water
#[derive(Debug, Serialize)]
pub struct WaterResponse {
    pub date: String,
    pub total_glasses: i64,
    pub goal_glasses: u32,
    pub remaining_glasses: i64,
    pub goal_met: bool,
    pub entries: Vec<WaterLog>,
}

/// Daily goal for a profile: the stored override, else the computed target
pub fn water_goal(profile: Option<&UserProfile>) -> u32 {
    match profile {
        Some(p) => p.water_goal_glasses.unwrap_or_else(|| {
            calculate_nutrition_targets(p.gender(), &p.biometrics(), &p.goals).water_glasses
        }),
        None => DEFAULT_WATER_GOAL,
    }
}

fn water_for_date(conn: &Connection, date: &str) -> Result<WaterResponse, String> {
    let total = WaterLog::day_total(conn, date).map_err(|e| format!("Failed to total water: {}", e))?;
    let entries =
        WaterLog::list_for_date(conn, date).map_err(|e| format!("Failed to list water: {}", e))?;
    let profile = UserProfile::get(conn).map_err(|e| format!("Failed to load profile: {}", e))?;
    let goal = water_goal(profile.as_ref());

    Ok(WaterResponse {
        date: date.to_string(),
        total_glasses: total,
        goal_glasses: goal,
        remaining_glasses: (goal as i64 - total).max(0),
        goal_met: total >= goal as i64,
        entries,
    })
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Add (or with a negative count, remove) glasses for a date
pub fn log_water(db: &Database, glasses: i64, date: Option<&str>) -> Result<WaterResponse, String> {
    if glasses == 0 {
        return Err("Glasses must be a non-zero number".to_string());
    }
    let date = format_date(resolve_date(date)?);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    WaterLog::add(&conn, &date, glasses).map_err(|e| format!("Failed to log water: {}", e))?;
    info!("Logged {} glass(es) of water for {}", glasses, date);

    water_for_date(&conn, &date)
}

/// Water intake for a date against the daily goal
pub fn get_water(db: &Database, date: Option<&str>) -> Result<WaterResponse, String> {
    let date = format_date(resolve_date(date)?);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    water_for_date(&conn, &date)
}
