//! Blood sugar readings
//!
//! Glucose in mg/dL with the context it was measured in. Status bands
//! depend on whether the reading was taken fasting.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// When a reading was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    Fasting,
    BeforeMeal,
    AfterMeal,
    Bedtime,
    Random,
}

impl MeasurementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Fasting => "fasting",
            MeasurementType::BeforeMeal => "before_meal",
            MeasurementType::AfterMeal => "after_meal",
            MeasurementType::Bedtime => "bedtime",
            MeasurementType::Random => "random",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "fasting" => MeasurementType::Fasting,
            "before_meal" | "pre_meal" => MeasurementType::BeforeMeal,
            "after_meal" | "post_meal" => MeasurementType::AfterMeal,
            "bedtime" => MeasurementType::Bedtime,
            _ => MeasurementType::Random,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MeasurementType::Fasting => "Fasting",
            MeasurementType::BeforeMeal => "Before Meal",
            MeasurementType::AfterMeal => "After Meal",
            MeasurementType::Bedtime => "Bedtime",
            MeasurementType::Random => "Random",
        }
    }

    fn is_fasting(&self) -> bool {
        matches!(self, MeasurementType::Fasting | MeasurementType::BeforeMeal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseStatus {
    Low,
    Normal,
    Elevated,
    High,
}

impl GlucoseStatus {
    /// Classify a reading (mg/dL)
    ///
    /// Fasting and before-meal: <70 low, <=100 normal, <=125 elevated.
    /// Otherwise: <70 low, <=140 normal, <=180 elevated.
    pub fn classify(glucose: f64, measurement: MeasurementType) -> Self {
        let (normal_max, elevated_max) = if measurement.is_fasting() {
            (100.0, 125.0)
        } else {
            (140.0, 180.0)
        };

        if glucose < 70.0 {
            GlucoseStatus::Low
        } else if glucose <= normal_max {
            GlucoseStatus::Normal
        } else if glucose <= elevated_max {
            GlucoseStatus::Elevated
        } else {
            GlucoseStatus::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GlucoseStatus::Low => "low",
            GlucoseStatus::Normal => "normal",
            GlucoseStatus::Elevated => "elevated",
            GlucoseStatus::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloodSugarReading {
    pub id: i64,
    pub glucose_mg_dl: f64,
    pub measurement_type: MeasurementType,
    pub status: GlucoseStatus,
    pub notes: Option<String>,
    pub logged_at: String,
}

/// Data for a new reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodSugarCreate {
    pub glucose_mg_dl: f64,
    pub measurement_type: MeasurementType,
    pub notes: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`; defaults to now
    pub logged_at: Option<String>,
}

/// Latest and average over a set of readings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloodSugarStats {
    pub count: i64,
    pub latest: Option<f64>,
    /// Rounded to the nearest mg/dL
    pub average: Option<i64>,
}

impl BloodSugarReading {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let glucose: f64 = row.get("glucose_mg_dl")?;
        let measurement_type = MeasurementType::from_str(&row.get::<_, String>("measurement_type")?);
        Ok(Self {
            id: row.get("id")?,
            glucose_mg_dl: glucose,
            measurement_type,
            status: GlucoseStatus::classify(glucose, measurement_type),
            notes: row.get("notes")?,
            logged_at: row.get("logged_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &BloodSugarCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO blood_sugar_readings (glucose_mg_dl, measurement_type, notes, logged_at)
            VALUES (?1, ?2, ?3, COALESCE(?4, datetime('now')))
            "#,
            params![
                data.glucose_mg_dl,
                data.measurement_type.as_str(),
                data.notes,
                data.logged_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM blood_sugar_readings WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(reading) => Ok(Some(reading)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent readings first
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM blood_sugar_readings ORDER BY logged_at DESC, id DESC LIMIT ?1",
        )?;
        let readings = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(readings)
    }

    /// Readings whose date falls in `[start_date, end_date]`, newest first
    pub fn list_by_date_range(
        conn: &Connection,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM blood_sugar_readings
            WHERE date(logged_at) >= date(?1) AND date(logged_at) <= date(?2)
            ORDER BY logged_at DESC, id DESC
            "#,
        )?;
        let readings = stmt
            .query_map([start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(readings)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM blood_sugar_readings WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

impl BloodSugarStats {
    /// Stats over readings ordered newest first
    pub fn from_readings(readings: &[BloodSugarReading]) -> Self {
        let count = readings.len() as i64;
        let average = if readings.is_empty() {
            None
        } else {
            let sum: f64 = readings.iter().map(|r| r.glucose_mg_dl).sum();
            Some((sum / readings.len() as f64).round() as i64)
        };
        Self {
            count,
            latest: readings.first().map(|r| r.glucose_mg_dl),
            average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn reading(glucose: f64, kind: MeasurementType, at: &str) -> BloodSugarCreate {
        BloodSugarCreate {
            glucose_mg_dl: glucose,
            measurement_type: kind,
            notes: None,
            logged_at: Some(at.to_string()),
        }
    }

    #[test]
    fn test_fasting_thresholds() {
        use GlucoseStatus::*;
        let f = MeasurementType::Fasting;
        assert_eq!(GlucoseStatus::classify(69.9, f), Low);
        assert_eq!(GlucoseStatus::classify(70.0, f), Normal);
        assert_eq!(GlucoseStatus::classify(100.0, f), Normal);
        assert_eq!(GlucoseStatus::classify(101.0, f), Elevated);
        assert_eq!(GlucoseStatus::classify(125.0, f), Elevated);
        assert_eq!(GlucoseStatus::classify(126.0, f), High);
        assert_eq!(GlucoseStatus::classify(110.0, MeasurementType::BeforeMeal), Elevated);
    }

    #[test]
    fn test_non_fasting_thresholds() {
        use GlucoseStatus::*;
        let a = MeasurementType::AfterMeal;
        assert_eq!(GlucoseStatus::classify(65.0, a), Low);
        assert_eq!(GlucoseStatus::classify(140.0, a), Normal);
        assert_eq!(GlucoseStatus::classify(180.0, a), Elevated);
        assert_eq!(GlucoseStatus::classify(181.0, MeasurementType::Random), High);
    }

    #[test]
    fn test_measurement_type_parse() {
        assert_eq!(MeasurementType::from_str("Before Meal"), MeasurementType::BeforeMeal);
        assert_eq!(MeasurementType::from_str("after-meal"), MeasurementType::AfterMeal);
        assert_eq!(MeasurementType::from_str("whenever"), MeasurementType::Random);
    }

    #[test]
    fn test_create_and_list() {
        let conn = setup();
        BloodSugarReading::create(&conn, &reading(95.0, MeasurementType::Fasting, "2026-10-17 07:00:00")).unwrap();
        BloodSugarReading::create(&conn, &reading(150.0, MeasurementType::AfterMeal, "2026-10-18 13:30:00")).unwrap();
        let latest = BloodSugarReading::create(&conn, &reading(130.0, MeasurementType::Fasting, "2026-10-19 07:00:00")).unwrap();

        assert_eq!(latest.status, GlucoseStatus::High);

        let recent = BloodSugarReading::list_recent(&conn, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, latest.id);

        let range = BloodSugarReading::list_by_date_range(&conn, "2026-10-17", "2026-10-18").unwrap();
        assert_eq!(range.len(), 2);

        let stats = BloodSugarStats::from_readings(&BloodSugarReading::list_recent(&conn, 10).unwrap());
        assert_eq!(stats.count, 3);
        assert_eq!(stats.latest, Some(130.0));
        assert_eq!(stats.average, Some(125));
    }

    #[test]
    fn test_empty_stats() {
        let stats = BloodSugarStats::from_readings(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.latest, None);
        assert_eq!(stats.average, None);
    }

    #[test]
    fn test_non_positive_glucose_rejected_by_schema() {
        let conn = setup();
        let result = BloodSugarReading::create(&conn, &reading(0.0, MeasurementType::Random, "2026-10-19 08:00:00"));
        assert!(result.is_err());
    }
}
