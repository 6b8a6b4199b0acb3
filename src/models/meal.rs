//! Meal model
//!
//! A logged meal and the food items detected in (or entered for) it. Meal
//! totals are cached on the meal row when it is created.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::Nutrition;
use crate::analysis::AnalyzedFood;
use crate::db::{DbError, DbResult};
use crate::guidance::FlaggedFood;

/// Meal type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Unspecified,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Unspecified => "unspecified",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "snack" => MealType::Snack,
            _ => MealType::Unspecified,
        }
    }

    /// Sort order within a day
    pub fn sort_order(&self) -> i32 {
        match self {
            MealType::Breakfast => 0,
            MealType::Lunch => 1,
            MealType::Dinner => 2,
            MealType::Snack => 3,
            MealType::Unspecified => 4,
        }
    }
}

/// A food item within a stored meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealItem {
    pub id: i64,
    pub meal_id: i64,
    pub name: String,
    pub confidence: f64,
    pub portion: String,
    pub nutrition: Nutrition,
    pub allergens: Vec<String>,
    pub health_warnings: Vec<String>,
}

/// Data for one item of a new meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealItemCreate {
    pub name: String,
    pub confidence: f64,
    pub portion: String,
    pub nutrition: Nutrition,
    pub allergens: Vec<String>,
    pub health_warnings: Vec<String>,
}

impl From<AnalyzedFood> for MealItemCreate {
    fn from(food: AnalyzedFood) -> Self {
        Self {
            name: food.name,
            confidence: food.confidence,
            portion: food.portion,
            nutrition: food.nutrition,
            allergens: food.allergens,
            health_warnings: food.health_warnings,
        }
    }
}

impl FlaggedFood for MealItem {
    fn food_name(&self) -> &str {
        &self.name
    }

    fn allergen_flags(&self) -> &[String] {
        &self.allergens
    }

    fn health_warnings(&self) -> &[String] {
        &self.health_warnings
    }
}

/// A logged meal with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub date: String,
    pub meal_type: MealType,
    pub name: Option<String>,
    pub image_ref: Option<String>,
    pub totals: Nutrition,
    pub notes: Option<String>,
    pub created_at: String,
    pub items: Vec<MealItem>,
}

/// Data for creating a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCreate {
    pub date: String,
    pub meal_type: MealType,
    pub name: Option<String>,
    pub image_ref: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<MealItemCreate>,
    /// Explicit totals; summed from items when absent
    pub totals: Option<Nutrition>,
}

/// Meal row without items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSummary {
    pub id: i64,
    pub date: String,
    pub meal_type: MealType,
    pub name: Option<String>,
    pub totals: Nutrition,
    pub item_count: i64,
    pub created_at: String,
}

fn list_from_json(json: &str) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl MealItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            meal_id: row.get("meal_id")?,
            name: row.get("name")?,
            confidence: row.get("confidence")?,
            portion: row.get("portion")?,
            nutrition: Nutrition::new(
                row.get("calories")?,
                row.get("protein")?,
                row.get("carbs")?,
                row.get("fat")?,
            ),
            allergens: list_from_json(&row.get::<_, String>("allergens")?)?,
            health_warnings: list_from_json(&row.get::<_, String>("health_warnings")?)?,
        })
    }

    /// Items of a meal in insertion order
    pub fn list_for_meal(conn: &Connection, meal_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM meal_items WHERE meal_id = ?1 ORDER BY position, id")?;
        let items = stmt
            .query_map([meal_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

fn totals_from_row(row: &Row) -> rusqlite::Result<Nutrition> {
    Ok(Nutrition::new(
        row.get("total_calories")?,
        row.get("total_protein")?,
        row.get("total_carbs")?,
        row.get("total_fat")?,
    ))
}

impl MealSummary {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            meal_type: MealType::from_str(&row.get::<_, String>("meal_type")?),
            name: row.get("name")?,
            totals: totals_from_row(row)?,
            item_count: row.get("item_count")?,
            created_at: row.get("created_at")?,
        })
    }
}

const SUMMARY_SELECT: &str = r#"
    SELECT m.*, (SELECT COUNT(*) FROM meal_items i WHERE i.meal_id = m.id) AS item_count
    FROM meals m
"#;

impl Meal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            meal_type: MealType::from_str(&row.get::<_, String>("meal_type")?),
            name: row.get("name")?,
            image_ref: row.get("image_ref")?,
            totals: totals_from_row(row)?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            items: Vec::new(),
        })
    }

    /// Create a meal and its items in one transaction
    pub fn create(conn: &mut Connection, data: &MealCreate) -> DbResult<Self> {
        let totals = data
            .totals
            .unwrap_or_else(|| data.items.iter().map(|i| i.nutrition).sum());

        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO meals (
                date, meal_type, name, image_ref,
                total_calories, total_protein, total_carbs, total_fat, notes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.date,
                data.meal_type.as_str(),
                data.name,
                data.image_ref,
                totals.calories,
                totals.protein,
                totals.carbs,
                totals.fat,
                data.notes,
            ],
        )?;
        let meal_id = tx.last_insert_rowid();

        for (position, item) in data.items.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO meal_items (
                    meal_id, position, name, confidence, portion,
                    calories, protein, carbs, fat, allergens, health_warnings
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
                params![
                    meal_id,
                    position as i64,
                    item.name,
                    item.confidence,
                    item.portion,
                    item.nutrition.calories,
                    item.nutrition.protein,
                    item.nutrition.carbs,
                    item.nutrition.fat,
                    serde_json::to_string(&item.allergens)?,
                    serde_json::to_string(&item.health_warnings)?,
                ],
            )?;
        }

        tx.commit()?;

        Self::get_by_id(conn, meal_id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a meal with its items
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        let mut meal = match result {
            Ok(meal) => meal,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        meal.items = MealItem::list_for_meal(conn, id)?;
        Ok(Some(meal))
    }

    /// Meals logged on a date, breakfast first
    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<MealSummary>> {
        let sql = format!(
            "{} WHERE m.date = ?1 ORDER BY
                CASE m.meal_type
                    WHEN 'breakfast' THEN 0 WHEN 'lunch' THEN 1
                    WHEN 'dinner' THEN 2 WHEN 'snack' THEN 3 ELSE 4
                END, m.created_at, m.id",
            SUMMARY_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let meals = stmt
            .query_map([date], MealSummary::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meals)
    }

    /// Most recent meals across all dates
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<MealSummary>> {
        let sql = format!(
            "{} ORDER BY m.date DESC, m.created_at DESC, m.id DESC LIMIT ?1",
            SUMMARY_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let meals = stmt
            .query_map([limit], MealSummary::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meals)
    }

    /// Distinct dates that have at least one meal, newest first
    pub fn list_dates(conn: &Connection) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare("SELECT DISTINCT date FROM meals ORDER BY date DESC")?;
        let dates = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(dates)
    }

    /// Sum of meal totals for a date
    pub fn day_totals(conn: &Connection, date: &str) -> DbResult<Nutrition> {
        let totals = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(total_calories), 0) AS total_calories,
                COALESCE(SUM(total_protein), 0) AS total_protein,
                COALESCE(SUM(total_carbs), 0) AS total_carbs,
                COALESCE(SUM(total_fat), 0) AS total_fat
            FROM meals WHERE date = ?1
            "#,
            [date],
            totals_from_row,
        )?;
        Ok(totals)
    }

    /// Delete a meal and its items
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn item(name: &str, calories: f64, allergens: &[&str]) -> MealItemCreate {
        MealItemCreate {
            name: name.to_string(),
            confidence: 0.9,
            portion: "1 serving".to_string(),
            nutrition: Nutrition::new(calories, 10.0, 20.0, 5.0),
            allergens: allergens.iter().map(|s| s.to_string()).collect(),
            health_warnings: vec![],
        }
    }

    fn meal(date: &str, meal_type: MealType, items: Vec<MealItemCreate>) -> MealCreate {
        MealCreate {
            date: date.to_string(),
            meal_type,
            name: None,
            image_ref: None,
            notes: None,
            items,
            totals: None,
        }
    }

    #[test]
    fn test_meal_type_parse() {
        assert_eq!(MealType::from_str("Lunch"), MealType::Lunch);
        assert_eq!(MealType::from_str("brunch"), MealType::Unspecified);
    }

    #[test]
    fn test_create_computes_totals_from_items() {
        let mut conn = setup();
        let created = Meal::create(
            &mut conn,
            &meal(
                "2026-10-19",
                MealType::Lunch,
                vec![item("Pasta", 400.0, &["wheat"]), item("Salad", 120.0, &[])],
            ),
        )
        .unwrap();

        assert_eq!(created.totals, Nutrition::new(520.0, 20.0, 40.0, 10.0));
        assert_eq!(created.items.len(), 2);
        assert_eq!(created.items[0].name, "Pasta");
        assert_eq!(created.items[0].allergens, vec!["wheat"]);
        assert_eq!(created.items[1].meal_id, created.id);
    }

    #[test]
    fn test_explicit_totals_win() {
        let mut conn = setup();
        let mut data = meal("2026-10-19", MealType::Snack, vec![item("Apple", 95.0, &[])]);
        data.totals = Some(Nutrition::new(100.0, 0.0, 25.0, 0.0));

        let created = Meal::create(&mut conn, &data).unwrap();
        assert_eq!(created.totals.calories, 100.0);
    }

    #[test]
    fn test_list_for_date_and_day_totals() {
        let mut conn = setup();
        Meal::create(&mut conn, &meal("2026-10-19", MealType::Dinner, vec![item("Fish", 300.0, &[])])).unwrap();
        Meal::create(&mut conn, &meal("2026-10-19", MealType::Breakfast, vec![item("Oats", 250.0, &[])])).unwrap();
        Meal::create(&mut conn, &meal("2026-10-18", MealType::Lunch, vec![item("Soup", 180.0, &[])])).unwrap();

        let meals = Meal::list_for_date(&conn, "2026-10-19").unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].meal_type, MealType::Breakfast);
        assert_eq!(meals[0].item_count, 1);

        let totals = Meal::day_totals(&conn, "2026-10-19").unwrap();
        assert_eq!(totals.calories, 550.0);
        assert_eq!(Meal::day_totals(&conn, "2026-01-01").unwrap(), Nutrition::zero());

        assert_eq!(Meal::list_dates(&conn).unwrap(), vec!["2026-10-19", "2026-10-18"]);
        assert_eq!(Meal::list_recent(&conn, 1).unwrap()[0].date, "2026-10-19");
    }

    #[test]
    fn test_delete_cascades_items() {
        let mut conn = setup();
        let created = Meal::create(&mut conn, &meal("2026-10-19", MealType::Lunch, vec![item("Pasta", 400.0, &[])])).unwrap();

        assert!(Meal::delete(&conn, created.id).unwrap());
        assert!(Meal::get_by_id(&conn, created.id).unwrap().is_none());
        assert!(MealItem::list_for_meal(&conn, created.id).unwrap().is_empty());
        assert!(!Meal::delete(&conn, created.id).unwrap());
    }

    #[test]
    fn test_from_analyzed_food() {
        let food = AnalyzedFood {
            name: "Toast".into(),
            allergens: vec!["wheat".into()],
            ..AnalyzedFood::default()
        };
        let item: MealItemCreate = food.into();
        assert_eq!(item.name, "Toast");
        assert_eq!(item.portion, "1 serving");
        assert_eq!(item.confidence, 0.5);
    }
}
