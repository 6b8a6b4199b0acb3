//! Medication MCP Tools
//!
//! Tools for managing medication reminders.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{normalize_time, Frequency, MedicationReminder, MedicationReminderCreate};

/// Reminder summary for listing
#[derive(Debug, Serialize)]
pub struct ReminderSummary {
    pub id: i64,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: String,
    pub reminder_times: Vec<String>,
    pub active: bool,
    pub last_taken_at: Option<String>,
}

impl From<&MedicationReminder> for ReminderSummary {
    fn from(med: &MedicationReminder) -> Self {
        Self {
            id: med.id,
            name: med.name.clone(),
            dosage: med.dosage.clone(),
            frequency: med.frequency.display_name().to_string(),
            reminder_times: med.reminder_times.clone(),
            active: med.active,
            last_taken_at: med.last_taken_at.clone(),
        }
    }
}

/// Response for list_medication_reminders
#[derive(Debug, Serialize)]
pub struct ListRemindersResponse {
    pub reminders: Vec<ReminderSummary>,
    pub total: usize,
}

/// Response for delete_medication_reminder
#[derive(Debug, Serialize)]
pub struct DeleteReminderResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub name: String,
}

fn not_found(id: i64) -> String {
    format!("Medication reminder not found with id: {}", id)
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Add a medication reminder
pub fn add_medication_reminder(
    db: &Database,
    name: &str,
    dosage: Option<String>,
    frequency: Option<&str>,
    reminder_times: &[String],
) -> Result<MedicationReminder, String> {
    if name.trim().is_empty() {
        return Err("Medication name cannot be empty".to_string());
    }

    let times = reminder_times
        .iter()
        .map(|t| normalize_time(t).ok_or_else(|| format!("Invalid time '{}': expected HH:MM", t)))
        .collect::<Result<Vec<_>, _>>()?;

    let data = MedicationReminderCreate {
        name: name.trim().to_string(),
        dosage: dosage.filter(|d| !d.trim().is_empty()),
        frequency: frequency.map(Frequency::from_str).unwrap_or(Frequency::Daily),
        reminder_times: times,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let reminder = MedicationReminder::create(&conn, &data)
        .map_err(|e| format!("Failed to add reminder: {}", e))?;

    info!("Added medication reminder: {}", reminder.name);
    Ok(reminder)
}

/// List reminders
pub fn list_medication_reminders(
    db: &Database,
    active_only: bool,
) -> Result<ListRemindersResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meds = MedicationReminder::list(&conn, active_only)
        .map_err(|e| format!("Failed to list reminders: {}", e))?;

    let reminders: Vec<ReminderSummary> = meds.iter().map(ReminderSummary::from).collect();
    let total = reminders.len();

    Ok(ListRemindersResponse { reminders, total })
}

/// Record that a dose was taken now
pub fn mark_medication_taken(db: &Database, id: i64) -> Result<MedicationReminder, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    MedicationReminder::mark_taken(&conn, id)
        .map_err(|e| format!("Failed to mark medication taken: {}", e))?
        .ok_or_else(|| not_found(id))
}

/// Pause or resume a reminder
pub fn set_medication_active(
    db: &Database,
    id: i64,
    active: bool,
) -> Result<MedicationReminder, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let reminder = MedicationReminder::set_active(&conn, id, active)
        .map_err(|e| format!("Failed to update reminder: {}", e))?
        .ok_or_else(|| not_found(id))?;

    info!(
        "{} reminder for {}",
        if active { "Resumed" } else { "Paused" },
        reminder.name
    );
    Ok(reminder)
}

/// Delete a reminder
pub fn delete_medication_reminder(db: &Database, id: i64) -> Result<DeleteReminderResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let reminder = MedicationReminder::get_by_id(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| not_found(id))?;

    MedicationReminder::delete(&conn, id)
        .map_err(|e| format!("Failed to delete reminder: {}", e))?;

    Ok(DeleteReminderResponse {
        success: true,
        deleted_id: id,
        name: reminder.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_list() {
        let db = Database::in_memory().unwrap();

        let reminder = add_medication_reminder(
            &db,
            "Vitamin D",
            Some("1000 IU".into()),
            Some("daily"),
            &["8:30".to_string()],
        )
        .unwrap();
        assert_eq!(reminder.reminder_times, vec!["08:30"]);
        assert!(reminder.active);

        let listed = list_medication_reminders(&db, true).unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.reminders[0].frequency, "Once daily");
    }

    #[test]
    fn test_add_validation() {
        let db = Database::in_memory().unwrap();
        assert!(add_medication_reminder(&db, "  ", None, None, &[]).is_err());
        let err = add_medication_reminder(&db, "Iron", None, None, &["25:00".to_string()])
            .unwrap_err();
        assert!(err.contains("Invalid time"));
    }

    #[test]
    fn test_taken_pause_and_delete() {
        let db = Database::in_memory().unwrap();
        let reminder = add_medication_reminder(&db, "Metformin", None, Some("bid"), &[]).unwrap();

        let taken = mark_medication_taken(&db, reminder.id).unwrap();
        assert!(taken.last_taken_at.is_some());

        let paused = set_medication_active(&db, reminder.id, false).unwrap();
        assert!(!paused.active);
        assert_eq!(list_medication_reminders(&db, true).unwrap().total, 0);
        assert_eq!(list_medication_reminders(&db, false).unwrap().total, 1);

        let deleted = delete_medication_reminder(&db, reminder.id).unwrap();
        assert_eq!(deleted.name, "Metformin");
        assert!(mark_medication_taken(&db, reminder.id).is_err());
        assert!(delete_medication_reminder(&db, reminder.id).is_err());
    }
}
