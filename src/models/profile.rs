//! User profile model
//!
//! One profile per database (row id 1). Goals, conditions and allergies are
//! free-form tag lists stored as JSON arrays.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{ActivityLevel, Biometrics, Gender};

const PROFILE_ID: i64 = 1;

/// The stored user profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// As entered; see [`UserProfile::gender`]
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: u32,
    pub activity_level: ActivityLevel,
    pub goals: Vec<String>,
    pub medical_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub water_goal_glasses: Option<u32>,
    pub notifications_enabled: bool,
    pub onboarding_completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Full profile data for an upsert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: u32,
    pub activity_level: ActivityLevel,
    pub goals: Vec<String>,
    pub medical_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub water_goal_glasses: Option<u32>,
    pub notifications_enabled: bool,
}

/// Partial profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub age_years: Option<u32>,
    pub activity_level: Option<ActivityLevel>,
    pub goals: Option<Vec<String>>,
    pub medical_conditions: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    /// `Some(0)` clears the override
    pub water_goal_glasses: Option<u32>,
    pub notifications_enabled: Option<bool>,
}

/// Drop blanks and the "none" placeholder, trim, keep first occurrence
pub fn clean_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("none") {
            continue;
        }
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn tags_from_json(json: &str) -> DbResult<Vec<String>> {
    Ok(serde_json::from_str(json)?)
}

fn tags_to_json(tags: &[String]) -> DbResult<String> {
    Ok(serde_json::to_string(tags)?)
}

struct ProfileRow {
    first_name: String,
    last_name: String,
    email: Option<String>,
    gender: String,
    height_cm: f64,
    weight_kg: f64,
    age_years: u32,
    activity_level: String,
    goals: String,
    medical_conditions: String,
    allergies: String,
    water_goal_glasses: Option<u32>,
    notifications_enabled: bool,
    onboarding_completed: bool,
    created_at: String,
    updated_at: String,
}

impl ProfileRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            gender: row.get("gender")?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            age_years: row.get("age_years")?,
            activity_level: row.get("activity_level")?,
            goals: row.get("goals")?,
            medical_conditions: row.get("medical_conditions")?,
            allergies: row.get("allergies")?,
            water_goal_glasses: row.get("water_goal_glasses")?,
            notifications_enabled: row.get::<_, i32>("notifications_enabled")? != 0,
            onboarding_completed: row.get::<_, i32>("onboarding_completed")? != 0,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn into_profile(self) -> DbResult<UserProfile> {
        Ok(UserProfile {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            gender: self.gender,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            age_years: self.age_years,
            activity_level: ActivityLevel::from_str(&self.activity_level).unwrap_or_default(),
            goals: tags_from_json(&self.goals)?,
            medical_conditions: tags_from_json(&self.medical_conditions)?,
            allergies: tags_from_json(&self.allergies)?,
            water_goal_glasses: self.water_goal_glasses,
            notifications_enabled: self.notifications_enabled,
            onboarding_completed: self.onboarding_completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserProfile {
    /// Parsed gender; anything unrecognized is treated as male
    pub fn gender(&self) -> Gender {
        Gender::from_str(&self.gender).unwrap_or(Gender::Male)
    }

    pub fn biometrics(&self) -> Biometrics {
        Biometrics::new(self.height_cm, self.weight_kg, self.age_years as f64)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Get the profile, if one has been saved
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profile WHERE id = ?1")?;

        let result = stmt.query_row([PROFILE_ID], ProfileRow::from_row);
        match result {
            Ok(row) => Ok(Some(row.into_profile()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create or fully replace the profile
    pub fn upsert(conn: &Connection, data: &ProfileData) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_profile (
                id, first_name, last_name, email, gender, height_cm, weight_kg,
                age_years, activity_level, goals, medical_conditions, allergies,
                water_goal_glasses, notifications_enabled
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email,
                gender = excluded.gender,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                age_years = excluded.age_years,
                activity_level = excluded.activity_level,
                goals = excluded.goals,
                medical_conditions = excluded.medical_conditions,
                allergies = excluded.allergies,
                water_goal_glasses = excluded.water_goal_glasses,
                notifications_enabled = excluded.notifications_enabled,
                updated_at = datetime('now')
            "#,
            params![
                PROFILE_ID,
                data.first_name.trim(),
                data.last_name.trim(),
                data.email,
                data.gender.as_str(),
                data.height_cm,
                data.weight_kg,
                data.age_years,
                data.activity_level.as_str(),
                tags_to_json(&clean_tags(&data.goals))?,
                tags_to_json(&clean_tags(&data.medical_conditions))?,
                tags_to_json(&clean_tags(&data.allergies))?,
                data.water_goal_glasses.filter(|&g| g > 0),
                data.notifications_enabled as i32,
            ],
        )?;

        Self::get(conn)?.ok_or(DbError::NotInitialized)
    }

    /// Apply a partial update; `None` when no profile exists
    pub fn update(conn: &Connection, data: &ProfileUpdate) -> DbResult<Option<Self>> {
        if Self::get(conn)?.is_none() {
            return Ok(None);
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref first) = data.first_name {
            updates.push(format!("first_name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(first.trim().to_string()));
        }
        if let Some(ref last) = data.last_name {
            updates.push(format!("last_name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(last.trim().to_string()));
        }
        if let Some(ref email) = data.email {
            updates.push(format!("email = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(email.clone()));
        }
        if let Some(gender) = data.gender {
            updates.push(format!("gender = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(gender.as_str().to_string()));
        }
        if let Some(height) = data.height_cm {
            updates.push(format!("height_cm = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(height));
        }
        if let Some(weight) = data.weight_kg {
            updates.push(format!("weight_kg = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(weight));
        }
        if let Some(age) = data.age_years {
            updates.push(format!("age_years = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(age));
        }
        if let Some(level) = data.activity_level {
            updates.push(format!("activity_level = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(level.as_str().to_string()));
        }
        if let Some(ref goals) = data.goals {
            updates.push(format!("goals = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(tags_to_json(&clean_tags(goals))?));
        }
        if let Some(ref conditions) = data.medical_conditions {
            updates.push(format!("medical_conditions = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(tags_to_json(&clean_tags(conditions))?));
        }
        if let Some(ref allergies) = data.allergies {
            updates.push(format!("allergies = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(tags_to_json(&clean_tags(allergies))?));
        }
        if let Some(glasses) = data.water_goal_glasses {
            updates.push(format!("water_goal_glasses = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(if glasses == 0 { None } else { Some(glasses) }));
        }
        if let Some(enabled) = data.notifications_enabled {
            updates.push(format!("notifications_enabled = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(enabled as i32));
        }

        if updates.is_empty() {
            return Self::get(conn);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE user_profile SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(PROFILE_ID));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get(conn)
    }

    /// Mark onboarding as finished
    pub fn complete_onboarding(conn: &Connection) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE user_profile SET onboarding_completed = 1, updated_at = datetime('now') WHERE id = ?1",
            [PROFILE_ID],
        )?;
        Self::get(conn)
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

    fn sample() -> ProfileData {
        ProfileData {
            first_name: " Alex ".into(),
            last_name: "Rivera".into(),
            email: Some("alex@example.com".into()),
            gender: Gender::Female,
            height_cm: 165.0,
            weight_kg: 62.5,
            age_years: 34,
            activity_level: ActivityLevel::Light,
            goals: vec!["weight_loss".into(), "weight_loss".into(), "energy_boost".into()],
            medical_conditions: vec!["none".into()],
            allergies: vec!["Tree Nuts".into(), " ".into()],
            water_goal_glasses: None,
            notifications_enabled: true,
        }
    }

    #[test]
    fn test_clean_tags() {
        assert_eq!(
            clean_tags(&["a", " a ", "None", "", "b"]),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_missing_profile() {
        let conn = setup();
        assert!(UserProfile::get(&conn).unwrap().is_none());
        assert!(UserProfile::update(&conn, &ProfileUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_upsert_round_trip() {
        let conn = setup();
        let profile = UserProfile::upsert(&conn, &sample()).unwrap();

        assert_eq!(profile.first_name, "Alex");
        assert_eq!(profile.full_name(), "Alex Rivera");
        assert_eq!(profile.gender(), Gender::Female);
        assert_eq!(profile.activity_level, ActivityLevel::Light);
        assert_eq!(profile.goals, vec!["weight_loss", "energy_boost"]);
        assert!(profile.medical_conditions.is_empty());
        assert_eq!(profile.allergies, vec!["Tree Nuts"]);
        assert!(!profile.onboarding_completed);
        assert_eq!(profile.biometrics(), Biometrics::new(165.0, 62.5, 34.0));

        let mut again = sample();
        again.weight_kg = 60.0;
        let replaced = UserProfile::upsert(&conn, &again).unwrap();
        assert_eq!(replaced.weight_kg, 60.0);
    }

    #[test]
    fn test_partial_update() {
        let conn = setup();
        UserProfile::upsert(&conn, &sample()).unwrap();

        let updated = UserProfile::update(
            &conn,
            &ProfileUpdate {
                weight_kg: Some(58.0),
                medical_conditions: Some(vec!["diabetes".into()]),
                water_goal_glasses: Some(10),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.weight_kg, 58.0);
        assert_eq!(updated.height_cm, 165.0);
        assert_eq!(updated.medical_conditions, vec!["diabetes"]);
        assert_eq!(updated.water_goal_glasses, Some(10));

        let cleared = UserProfile::update(
            &conn,
            &ProfileUpdate {
                water_goal_glasses: Some(0),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(cleared.water_goal_glasses, None);
    }

    #[test]
    fn test_unknown_gender_falls_back_to_male() {
        let conn = setup();
        UserProfile::upsert(&conn, &sample()).unwrap();
        conn.execute("UPDATE user_profile SET gender = 'other'", []).unwrap();

        let profile = UserProfile::get(&conn).unwrap().unwrap();
        assert_eq!(profile.gender, "other");
        assert_eq!(profile.gender(), Gender::Male);
    }

    #[test]
    fn test_complete_onboarding() {
        let conn = setup();
        UserProfile::upsert(&conn, &sample()).unwrap();
        let profile = UserProfile::complete_onboarding(&conn).unwrap().unwrap();
        assert!(profile.onboarding_completed);
    }
}
