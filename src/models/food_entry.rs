//! Food Entry model
//!
//! A catalog food logged into the diary, with nutrients already scaled to
//! the portion eaten.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::NutrientVector;

/// Meal type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" | "snacks" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// A logged diary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub food_name: String,
    /// FoodData Central id of the source food
    pub catalog_id: Option<i64>,
    /// Grams eaten
    pub portion_size: f64,
    pub portion_unit: String,
    /// Grams the catalog amounts were reported per
    pub reference_portion: f64,
    pub nutrients: NutrientVector,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFoodEntry {
    pub meal_type: MealType,
    pub food_name: String,
    pub catalog_id: Option<i64>,
    pub portion_size: f64,
    pub portion_unit: String,
    pub reference_portion: f64,
    pub nutrients: NutrientVector,
}

impl NewFoodEntry {
    /// Turn into a stored entry with the given id and date
    pub fn into_entry(self, id: i64, date: NaiveDate, created_at: DateTime<Utc>) -> FoodEntry {
        FoodEntry {
            id,
            date,
            meal_type: self.meal_type,
            food_name: self.food_name,
            catalog_id: self.catalog_id,
            portion_size: self.portion_size,
            portion_unit: self.portion_unit,
            reference_portion: self.reference_portion,
            nutrients: self.nutrients,
            created_at,
        }
    }
}

impl FoodEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type: String = row.get("meal_type")?;
        let nutrients_json: String = row.get("nutrients")?;

        let meal_type = MealType::parse(&meal_type).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                format!("unknown meal type '{}'", meal_type).into(),
            )
        })?;
        let nutrients = serde_json::from_str(&nutrients_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            meal_type,
            food_name: row.get("food_name")?,
            catalog_id: row.get("catalog_id")?,
            portion_size: row.get("portion_size")?,
            portion_unit: row.get("portion_unit")?,
            reference_portion: row.get("reference_portion")?,
            nutrients,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new entry for a date
    pub fn create(conn: &Connection, date: NaiveDate, data: &NewFoodEntry) -> DbResult<Self> {
        let nutrients_json = serde_json::to_string(&data.nutrients)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        conn.execute(
            r#"
            INSERT INTO food_entries (
                date, meal_type, food_name, catalog_id,
                portion_size, portion_unit, reference_portion, nutrients, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                date,
                data.meal_type.as_str(),
                data.food_name,
                data.catalog_id,
                data.portion_size,
                data.portion_unit,
                data.reference_portion,
                nutrients_json,
                Utc::now(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All entries for a date, in logging order
    pub fn list_for_date(conn: &Connection, date: NaiveDate) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_entries WHERE date = ?1 ORDER BY created_at, id",
        )?;
        let entries = stmt
            .query_map(params![date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// All entries, oldest date first
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_entries ORDER BY date, created_at, id")?;
        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete an entry belonging to a date
    pub fn delete(conn: &Connection, date: NaiveDate, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM food_entries WHERE id = ?1 AND date = ?2",
            params![id, date],
        )?;
        Ok(rows > 0)
    }

    /// Distinct dates that have at least one entry, newest first
    pub fn dates_with_entries(conn: &Connection) -> DbResult<Vec<NaiveDate>> {
        let mut stmt =
            conn.prepare("SELECT DISTINCT date FROM food_entries ORDER BY date DESC")?;
        let dates = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<NaiveDate>, _>>()?;

        Ok(dates)
    }

    /// Remove every entry
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM food_entries", [])?)
    }
}
