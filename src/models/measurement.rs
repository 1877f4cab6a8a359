//! Measurement model
//!
//! Body measurements: weight plus optional composition and circumferences.
//! History is append-only.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::{CalcError, CalcResult};

/// A recorded body measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub body_fat_percent: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub arms_cm: Option<f64>,
    pub thighs_cm: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for recording a measurement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMeasurement {
    pub date: Option<NaiveDate>,
    pub weight_kg: f64,
    pub body_fat_percent: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub arms_cm: Option<f64>,
    pub thighs_cm: Option<f64>,
    pub notes: Option<String>,
}

fn check_positive(field: &'static str, value: Option<f64>) -> CalcResult<()> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => {
            Err(CalcError::measurement(field, format!("must be > 0, got {}", v)))
        }
        _ => Ok(()),
    }
}

impl NewMeasurement {
    pub fn validate(&self) -> CalcResult<()> {
        check_positive("weight_kg", Some(self.weight_kg))?;
        if let Some(bf) = self.body_fat_percent {
            if !bf.is_finite() || !(0.0..=100.0).contains(&bf) {
                return Err(CalcError::measurement(
                    "body_fat_percent",
                    format!("must be between 0 and 100, got {}", bf),
                ));
            }
        }
        check_positive("muscle_mass_kg", self.muscle_mass_kg)?;
        check_positive("waist_cm", self.waist_cm)?;
        check_positive("chest_cm", self.chest_cm)?;
        check_positive("arms_cm", self.arms_cm)?;
        check_positive("thighs_cm", self.thighs_cm)?;
        Ok(())
    }

    /// Turn into a stored measurement; a missing date means today
    pub fn into_measurement(self, id: i64, created_at: DateTime<Utc>) -> Measurement {
        Measurement {
            id,
            date: self.date.unwrap_or_else(|| created_at.date_naive()),
            weight_kg: self.weight_kg,
            body_fat_percent: self.body_fat_percent,
            muscle_mass_kg: self.muscle_mass_kg,
            waist_cm: self.waist_cm,
            chest_cm: self.chest_cm,
            arms_cm: self.arms_cm,
            thighs_cm: self.thighs_cm,
            notes: self.notes,
            created_at,
        }
    }
}

impl Measurement {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
            body_fat_percent: row.get("body_fat_percent")?,
            muscle_mass_kg: row.get("muscle_mass_kg")?,
            waist_cm: row.get("waist_cm")?,
            chest_cm: row.get("chest_cm")?,
            arms_cm: row.get("arms_cm")?,
            thighs_cm: row.get("thighs_cm")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a measurement
    pub fn create(conn: &Connection, data: &NewMeasurement) -> DbResult<Self> {
        let now = Utc::now();
        let date = data.date.unwrap_or_else(|| now.date_naive());

        conn.execute(
            r#"
            INSERT INTO measurements (
                date, weight_kg, body_fat_percent, muscle_mass_kg,
                waist_cm, chest_cm, arms_cm, thighs_cm, notes, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                date,
                data.weight_kg,
                data.body_fat_percent,
                data.muscle_mass_kg,
                data.waist_cm,
                data.chest_cm,
                data.arms_cm,
                data.thighs_cm,
                data.notes,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a measurement by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM measurements WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All measurements, newest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM measurements ORDER BY date DESC, created_at DESC, id DESC",
        )?;
        let measurements = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(measurements)
    }

    /// Remove every measurement
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM measurements", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewMeasurement {
        NewMeasurement {
            weight_kg: 72.4,
            body_fat_percent: Some(18.0),
            ..NewMeasurement::default()
        }
    }

    #[test]
    fn test_validate_accepts_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let no_weight = NewMeasurement { weight_kg: 0.0, ..valid() };
        assert!(matches!(
            no_weight.validate(),
            Err(CalcError::InvalidMeasurement { field: "weight_kg", .. })
        ));

        let bad_fat = NewMeasurement { body_fat_percent: Some(120.0), ..valid() };
        assert!(matches!(
            bad_fat.validate(),
            Err(CalcError::InvalidMeasurement { field: "body_fat_percent", .. })
        ));

        let bad_waist = NewMeasurement { waist_cm: Some(-1.0), ..valid() };
        assert!(matches!(
            bad_waist.validate(),
            Err(CalcError::InvalidMeasurement { field: "waist_cm", .. })
        ));
    }

    #[test]
    fn test_missing_date_defaults_to_creation_day() {
        let now = Utc::now();
        let m = valid().into_measurement(1, now);
        assert_eq!(m.date, now.date_naive());
    }
}
