//! Blood Sugar MCP Tools
//!
//! Glucose logging and history for users tracking diabetes.

use serde::Serialize;
use tracing::{info, warn};

use super::{format_date, resolve_date, today};
use crate::db::Database;
use crate::models::{
    BloodSugarCreate, BloodSugarReading, BloodSugarStats, GlucoseStatus, MeasurementType,
};

/// Response for log_blood_sugar
#[derive(Debug, Serialize)]
pub struct LogBloodSugarResponse {
    pub reading: BloodSugarReading,
    pub message: String,
}

/// Response for list_blood_sugar
#[derive(Debug, Serialize)]
pub struct BloodSugarHistory {
    pub readings: Vec<BloodSugarReading>,
    pub stats: BloodSugarStats,
}

fn status_message(reading: &BloodSugarReading) -> String {
    let context = reading.measurement_type.display_name().to_lowercase();
    match reading.status {
        GlucoseStatus::Low => format!(
            "{:.0} mg/dL ({}) is low. Consider a fast-acting carbohydrate and recheck in 15 minutes.",
            reading.glucose_mg_dl, context
        ),
        GlucoseStatus::Normal => format!(
            "{:.0} mg/dL ({}) is in the normal range.",
            reading.glucose_mg_dl, context
        ),
        GlucoseStatus::Elevated => format!(
            "{:.0} mg/dL ({}) is elevated.",
            reading.glucose_mg_dl, context
        ),
        GlucoseStatus::High => format!(
            "{:.0} mg/dL ({}) is high. Contact your healthcare provider if it stays high.",
            reading.glucose_mg_dl, context
        ),
    }
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Record a glucose reading
pub fn log_blood_sugar(
    db: &Database,
    glucose_mg_dl: f64,
    measurement_type: Option<&str>,
    notes: Option<String>,
    logged_at: Option<String>,
) -> Result<LogBloodSugarResponse, String> {
    if !(glucose_mg_dl.is_finite() && glucose_mg_dl > 0.0) {
        return Err("Glucose must be greater than 0 mg/dL".to_string());
    }

    let data = BloodSugarCreate {
        glucose_mg_dl,
        measurement_type: measurement_type
            .map(MeasurementType::from_str)
            .unwrap_or(MeasurementType::Random),
        notes: notes.filter(|n| !n.trim().is_empty()),
        logged_at: logged_at.filter(|t| !t.trim().is_empty()),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let reading = BloodSugarReading::create(&conn, &data)
        .map_err(|e| format!("Failed to log blood sugar: {}", e))?;

    match reading.status {
        GlucoseStatus::Low | GlucoseStatus::High => warn!(
            "Blood sugar {} reading: {} mg/dL",
            reading.status.as_str(),
            reading.glucose_mg_dl
        ),
        _ => info!("Logged blood sugar reading: {} mg/dL", reading.glucose_mg_dl),
    }

    Ok(LogBloodSugarResponse {
        message: status_message(&reading),
        reading,
    })
}

/// Recent readings, or readings within a date range
pub fn list_blood_sugar(
    db: &Database,
    limit: Option<i64>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<BloodSugarHistory, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let readings = if start_date.is_some() || end_date.is_some() {
        let start = match start_date {
            Some(d) => resolve_date(Some(d))?,
            None => chrono::NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default(),
        };
        let end = match end_date {
            Some(d) => resolve_date(Some(d))?,
            None => today(),
        };
        if start > end {
            return Err("start_date must not be after end_date".to_string());
        }
        BloodSugarReading::list_by_date_range(&conn, &format_date(start), &format_date(end))
    } else {
        BloodSugarReading::list_recent(&conn, limit.unwrap_or(30).clamp(1, 500))
    }
    .map_err(|e| format!("Failed to list blood sugar: {}", e))?;

    Ok(BloodSugarHistory {
        stats: BloodSugarStats::from_readings(&readings),
        readings,
    })
}
