//! Medication reminder model
//!
//! A medication the user wants reminding about, with the times of day it is
//! due. Reminders are deactivated rather than deleted when a course ends.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// How often a medication is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    TwiceDaily,
    ThreeTimesDaily,
    Weekly,
    AsNeeded,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::TwiceDaily => "twice_daily",
            Frequency::ThreeTimesDaily => "three_times_daily",
            Frequency::Weekly => "weekly",
            Frequency::AsNeeded => "as_needed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "twice_daily" | "bid" => Frequency::TwiceDaily,
            "three_times_daily" | "tid" => Frequency::ThreeTimesDaily,
            "weekly" => Frequency::Weekly,
            "as_needed" | "prn" => Frequency::AsNeeded,
            _ => Frequency::Daily,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Frequency::Daily => "Once daily",
            Frequency::TwiceDaily => "Twice daily",
            Frequency::ThreeTimesDaily => "Three times daily",
            Frequency::Weekly => "Weekly",
            Frequency::AsNeeded => "As needed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationReminder {
    pub id: i64,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Frequency,
    /// Times of day as HH:MM
    pub reminder_times: Vec<String>,
    pub active: bool,
    pub last_taken_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a reminder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationReminderCreate {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Frequency,
    pub reminder_times: Vec<String>,
}

/// Parse `H:MM` or `HH:MM` into normalized `HH:MM`
pub fn normalize_time(time: &str) -> Option<String> {
    let (h, m) = time.trim().split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 || m.len() != 2 {
        return None;
    }
    Some(format!("{:02}:{:02}", hour, minute))
}

impl MedicationReminder {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let times: String = row.get("reminder_times")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            dosage: row.get("dosage")?,
            frequency: Frequency::from_str(&row.get::<_, String>("frequency")?),
            reminder_times: serde_json::from_str(&times).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
            })?,
            active: row.get::<_, i32>("active")? != 0,
            last_taken_at: row.get("last_taken_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a reminder; times are stored sorted and de-duplicated
    pub fn create(conn: &Connection, data: &MedicationReminderCreate) -> DbResult<Self> {
        let mut times = data.reminder_times.clone();
        times.sort();
        times.dedup();

        conn.execute(
            r#"
            INSERT INTO medication_reminders (name, dosage, frequency, reminder_times)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                data.name.trim(),
                data.dosage,
                data.frequency.as_str(),
                serde_json::to_string(&times)?,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM medication_reminders WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(med) => Ok(Some(med)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List reminders, active ones first
    pub fn list(conn: &Connection, active_only: bool) -> DbResult<Vec<Self>> {
        let sql = if active_only {
            "SELECT * FROM medication_reminders WHERE active = 1 ORDER BY name"
        } else {
            "SELECT * FROM medication_reminders ORDER BY active DESC, name"
        };

        let mut stmt = conn.prepare(sql)?;
        let meds = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meds)
    }

    /// Record a dose taken now
    pub fn mark_taken(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        conn.execute(
            r#"
            UPDATE medication_reminders SET
                last_taken_at = datetime('now'),
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            [id],
        )?;
        Self::get_by_id(conn, id)
    }

    /// Turn reminders for a medication on or off
    pub fn set_active(conn: &Connection, id: i64, active: bool) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE medication_reminders SET active = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![active as i32, id],
        )?;
        Self::get_by_id(conn, id)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM medication_reminders WHERE id = ?1", [id])?;
        Ok(rows > 0)
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

    fn metformin() -> MedicationReminderCreate {
        MedicationReminderCreate {
            name: "Metformin ".into(),
            dosage: Some("500 mg".into()),
            frequency: Frequency::TwiceDaily,
            reminder_times: vec!["20:00".into(), "08:00".into(), "08:00".into()],
        }
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("8:05").as_deref(), Some("08:05"));
        assert_eq!(normalize_time(" 20:00 ").as_deref(), Some("20:00"));
        assert_eq!(normalize_time("24:00"), None);
        assert_eq!(normalize_time("12:5"), None);
        assert_eq!(normalize_time("noon"), None);
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!(Frequency::from_str("Twice Daily"), Frequency::TwiceDaily);
        assert_eq!(Frequency::from_str("prn"), Frequency::AsNeeded);
        assert_eq!(Frequency::from_str(""), Frequency::Daily);
    }

    #[test]
    fn test_create_and_mark_taken() {
        let conn = setup();
        let med = MedicationReminder::create(&conn, &metformin()).unwrap();

        assert_eq!(med.name, "Metformin");
        assert_eq!(med.reminder_times, vec!["08:00", "20:00"]);
        assert!(med.active);
        assert!(med.last_taken_at.is_none());

        let taken = MedicationReminder::mark_taken(&conn, med.id).unwrap().unwrap();
        assert!(taken.last_taken_at.is_some());
        assert!(MedicationReminder::mark_taken(&conn, 999).unwrap().is_none());
    }

    #[test]
    fn test_deactivate_and_list() {
        let conn = setup();
        let a = MedicationReminder::create(&conn, &metformin()).unwrap();
        MedicationReminder::create(
            &conn,
            &MedicationReminderCreate {
                name: "Vitamin D".into(),
                dosage: None,
                frequency: Frequency::Daily,
                reminder_times: vec![],
            },
        )
        .unwrap();

        MedicationReminder::set_active(&conn, a.id, false).unwrap();
        assert_eq!(MedicationReminder::list(&conn, true).unwrap().len(), 1);

        let all = MedicationReminder::list(&conn, false).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Vitamin D");
        assert!(!all[1].active);

        assert!(MedicationReminder::delete(&conn, a.id).unwrap());
        assert!(!MedicationReminder::delete(&conn, a.id).unwrap());
    }
}
