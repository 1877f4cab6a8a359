//! Database migrations
//!
//! Versioned schema scripts applied in order and recorded in
//! `schema_migrations`.

use rusqlite::Connection;

use super::connection::DbResult;

/// Schema scripts by version; append new versions, never edit old ones
const MIGRATIONS: &[(i32, &str)] = &[(1, SCHEMA_V1)];

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

const SCHEMA_V1: &str = r#"
        -- ============================================
        -- USER PROFILE
        -- Single row (id = 1) of goal-calculation settings
        -- ============================================
        CREATE TABLE user_profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            age INTEGER NOT NULL CHECK(age > 0),
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female')),
            weight_kg REAL NOT NULL CHECK(weight_kg > 0),
            height_cm REAL NOT NULL CHECK(height_cm > 0),
            activity_level TEXT NOT NULL,
            goal TEXT NOT NULL CHECK(goal IN ('lose', 'maintain', 'gain')),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD ENTRIES
        -- Diary entries, nutrients scaled to the portion eaten
        -- ============================================
        CREATE TABLE food_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack')),
            food_name TEXT NOT NULL,
            catalog_id INTEGER,                  -- FoodData Central fdcId
            portion_size REAL NOT NULL CHECK(portion_size > 0),
            portion_unit TEXT NOT NULL DEFAULT 'g',
            reference_portion REAL NOT NULL DEFAULT 100 CHECK(reference_portion > 0),
            nutrients TEXT NOT NULL DEFAULT '{}', -- JSON object keyed by nutrient id
            created_at TEXT NOT NULL
        );

        CREATE INDEX idx_food_entries_date ON food_entries(date);

        -- ============================================
        -- MEASUREMENTS
        -- Append-only body measurement history
        -- ============================================
        CREATE TABLE measurements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            weight_kg REAL NOT NULL CHECK(weight_kg > 0),
            body_fat_percent REAL,
            muscle_mass_kg REAL,
            waist_cm REAL,
            chest_cm REAL,
            arms_cm REAL,
            thighs_cm REAL,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX idx_measurements_date ON measurements(date);
        "#;

/// Bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    if !needs_migration(conn)? {
        return Ok(());
    }

    let current_version = get_schema_version(conn)?;
    for (version, script) in MIGRATIONS.iter().filter(|(v, _)| *v > current_version) {
        conn.execute_batch(script)?;
        conn.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )?;
        tracing::info!("Applied schema migration v{}", version);
    }

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
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_fresh_database_needs_migration() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE schema_migrations (version INTEGER PRIMARY KEY, applied_at TEXT)",
            [],
        )
        .unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        assert!(!needs_migration(&conn).unwrap());
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'food_entries'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
