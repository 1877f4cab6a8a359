//! Utility to set the user profile in the database
//!
//! Usage: set_profile age=42 gender=female weight_kg=68 height_cm=170 \
//!        activity_level=light goal=lose
//!
//! Fields not given keep their stored (or default) value.

use nutritrack::config::Config;
use nutritrack::db::Database;
use nutritrack::store::{ProfileStore, SqliteStore};
use nutritrack::tools::profile::{apply_update, SettingsUpdate};

fn parse_args(args: impl Iterator<Item = String>) -> Result<SettingsUpdate, String> {
    let mut update = SettingsUpdate::default();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("Expected field=value, got '{}'", arg))?;
        let number = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| format!("{} must be a number, got '{}'", key, v))
        };
        match key {
            "age" => {
                update.age = Some(
                    value
                        .parse()
                        .map_err(|_| format!("age must be a whole number, got '{}'", value))?,
                )
            }
            "gender" => update.gender = Some(value.to_string()),
            "weight_kg" => update.weight_kg = Some(number(value)?),
            "height_cm" => update.height_cm = Some(number(value)?),
            "activity_level" => update.activity_level = Some(value.to_string()),
            "goal" => update.goal = Some(value.to_string()),
            other => return Err(format!("Unknown field '{}'", other)),
        }
    }
    Ok(update)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let update = parse_args(std::env::args().skip(1))?;

    let config = Config::from_env();
    let db_path = config.database_path;
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let store = SqliteStore::new(Database::new(&db_path)?)?;
    let current = store.profile_or_default()?;
    let profile = apply_update(&current, &update)?;
    let saved = store.set_profile(&profile)?;

    println!("Profile set:");
    println!("  Age: {}", saved.age);
    println!("  Gender: {}", saved.gender.as_str());
    println!("  Weight: {} kg", saved.weight_kg);
    println!("  Height: {} cm", saved.height_cm);
    println!("  Activity: {}", saved.activity_level.as_str());
    println!("  Goal: {}", saved.goal.as_str());
    Ok(())
}
