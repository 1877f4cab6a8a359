//! Profile model
//!
//! Stores the single user's profile settings.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::db::DbResult;
use crate::nutrition::{ActivityLevel, Gender, UserProfile, WeightGoal};

fn from_row(row: &Row) -> rusqlite::Result<UserProfile> {
    let gender: String = row.get("gender")?;
    let activity_level: String = row.get("activity_level")?;
    let goal: String = row.get("goal")?;

    let goal = WeightGoal::parse(&goal)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    Ok(UserProfile {
        age: row.get("age")?,
        gender: Gender::from_input(&gender),
        weight_kg: row.get("weight_kg")?,
        height_cm: row.get("height_cm")?,
        activity_level: ActivityLevel::from_input(&activity_level),
        goal,
    })
}

/// Get the stored profile (single row table)
pub fn get(conn: &Connection) -> DbResult<Option<UserProfile>> {
    let mut stmt = conn.prepare("SELECT * FROM user_profile WHERE id = 1")?;

    let result = stmt.query_row([], from_row);
    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replace the stored profile (upsert)
pub fn set(conn: &Connection, profile: &UserProfile) -> DbResult<UserProfile> {
    conn.execute(
        r#"
        INSERT INTO user_profile (id, age, gender, weight_kg, height_cm, activity_level, goal)
        VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(id) DO UPDATE SET
            age = excluded.age,
            gender = excluded.gender,
            weight_kg = excluded.weight_kg,
            height_cm = excluded.height_cm,
            activity_level = excluded.activity_level,
            goal = excluded.goal,
            updated_at = datetime('now')
        "#,
        params![
            profile.age,
            profile.gender.as_str(),
            profile.weight_kg,
            profile.height_cm,
            profile.activity_level.as_str(),
            profile.goal.as_str(),
        ],
    )?;

    get(conn)?.ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}
