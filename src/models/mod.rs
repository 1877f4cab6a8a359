//! Data models
//!
//! Diary entries, body measurements, and the stored profile.

mod food_entry;
mod measurement;
pub mod profile;

pub use food_entry::{FoodEntry, MealType, NewFoodEntry};
pub use measurement::{Measurement, NewMeasurement};
