//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 2;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    if current_version < 2 {
        migrate_v2(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (2)", [])?;
    }

    Ok(())
}

/// Migration v1: profile, meals, water
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER PROFILE
        -- Single row; tag lists stored as JSON arrays
        -- ============================================
        CREATE TABLE user_profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            email TEXT,
            gender TEXT NOT NULL DEFAULT 'male',
            height_cm REAL NOT NULL,
            weight_kg REAL NOT NULL,
            age_years INTEGER NOT NULL,
            activity_level TEXT NOT NULL DEFAULT 'moderate'
                CHECK(activity_level IN ('sedentary', 'light', 'moderate', 'active', 'very_active')),
            goals TEXT NOT NULL DEFAULT '[]',
            medical_conditions TEXT NOT NULL DEFAULT '[]',
            allergies TEXT NOT NULL DEFAULT '[]',
            water_goal_glasses INTEGER,          -- overrides the computed target
            notifications_enabled INTEGER NOT NULL DEFAULT 1,
            onboarding_completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- MEALS
        -- One row per logged meal, totals cached from items
        -- ============================================
        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,                  -- YYYY-MM-DD
            meal_type TEXT NOT NULL DEFAULT 'unspecified'
                CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack', 'unspecified')),
            name TEXT,
            image_ref TEXT,
            total_calories REAL NOT NULL DEFAULT 0,
            total_protein REAL NOT NULL DEFAULT 0,
            total_carbs REAL NOT NULL DEFAULT 0,
            total_fat REAL NOT NULL DEFAULT 0,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meals_date ON meals(date);

        CREATE TABLE meal_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meal_id INTEGER NOT NULL REFERENCES meals(id) ON DELETE CASCADE,
            position INTEGER NOT NULL DEFAULT 0,
            name TEXT NOT NULL,
            confidence REAL NOT NULL DEFAULT 1.0,
            portion TEXT NOT NULL DEFAULT '1 serving',
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            allergens TEXT NOT NULL DEFAULT '[]',
            health_warnings TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX idx_meal_items_meal ON meal_items(meal_id);

        -- ============================================
        -- WATER
        -- Glasses added per day; negative entries undo
        -- ============================================
        CREATE TABLE water_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            glasses INTEGER NOT NULL,
            logged_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_water_logs_date ON water_logs(date);
        "#,
    )?;

    Ok(())
}

/// Migration v2: blood sugar readings and medication reminders
fn migrate_v2(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE blood_sugar_readings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            glucose_mg_dl REAL NOT NULL CHECK(glucose_mg_dl > 0),
            measurement_type TEXT NOT NULL DEFAULT 'random'
                CHECK(measurement_type IN ('fasting', 'before_meal', 'after_meal', 'bedtime', 'random')),
            notes TEXT,
            logged_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_blood_sugar_logged_at ON blood_sugar_readings(logged_at);

        CREATE TABLE medication_reminders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            dosage TEXT,
            frequency TEXT NOT NULL DEFAULT 'daily',
            reminder_times TEXT NOT NULL DEFAULT '[]', -- JSON list of HH:MM
            active INTEGER NOT NULL DEFAULT 1,
            last_taken_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_medication_reminders_active ON medication_reminders(active);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap_or(true));

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_profile_is_single_row() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let insert = "INSERT INTO user_profile (id, height_cm, weight_kg, age_years) VALUES (?1, 170, 70, 30)";
        conn.execute(insert, [1]).unwrap();
        assert!(conn.execute(insert, [2]).is_err());
    }
}
