//! Water intake log

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Glasses of water added on a date; negative entries undo earlier ones
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterLog {
    pub id: i64,
    pub date: String,
    pub glasses: i64,
    pub logged_at: String,
}

impl WaterLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            glasses: row.get("glasses")?,
            logged_at: row.get("logged_at")?,
        })
    }

    /// Record glasses for a date
    pub fn add(conn: &Connection, date: &str, glasses: i64) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO water_logs (date, glasses) VALUES (?1, ?2)",
            params![date, glasses],
        )?;
        let id = conn.last_insert_rowid();

        let mut stmt = conn.prepare("SELECT * FROM water_logs WHERE id = ?1")?;
        stmt.query_row([id], Self::from_row).map_err(DbError::from)
    }

    /// Total glasses for a date, never below zero
    pub fn day_total(conn: &Connection, date: &str) -> DbResult<i64> {
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(glasses), 0) FROM water_logs WHERE date = ?1",
            [date],
            |row| row.get(0),
        )?;
        Ok(total.max(0))
    }

    /// Entries for a date, oldest first
    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM water_logs WHERE date = ?1 ORDER BY logged_at, id")?;
        let logs = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_add_and_total() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        WaterLog::add(&conn, "2026-10-19", 2).unwrap();
        WaterLog::add(&conn, "2026-10-19", 3).unwrap();
        let undo = WaterLog::add(&conn, "2026-10-19", -1).unwrap();
        WaterLog::add(&conn, "2026-10-18", 8).unwrap();

        assert_eq!(undo.glasses, -1);
        assert_eq!(WaterLog::day_total(&conn, "2026-10-19").unwrap(), 4);
        assert_eq!(WaterLog::list_for_date(&conn, "2026-10-19").unwrap().len(), 3);
        assert_eq!(WaterLog::day_total(&conn, "2026-10-17").unwrap(), 0);
    }

    #[test]
    fn test_total_never_negative() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        WaterLog::add(&conn, "2026-10-19", -3).unwrap();
        assert_eq!(WaterLog::day_total(&conn, "2026-10-19").unwrap(), 0);
    }
}
