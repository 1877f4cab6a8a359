//! Metric unit recognition and conversion constants
//!
//! Catalog data arrives with its own unit spellings ("G", "MG", "UG", "KCAL",
//! "kJ", "GRM", "MLT"). These helpers map them onto the units the tracker
//! stores, metric only.

use super::nutrients::NutrientUnit;

// ============================================================================
// Mass Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per microgram
pub const G_PER_MCG: f64 = 0.000_001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;

// ============================================================================
// Energy / Volume Constants
// ============================================================================

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;

/// Category of a catalog unit string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCategory {
    /// Mass units (mcg, mg, g, kg)
    Mass,
    /// Energy units (kcal, kJ)
    Energy,
    /// Volume units (ml, l)
    Volume,
    /// Anything else (IU, "serving", empty)
    Other,
}

/// Get the conversion factor to grams for a mass unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();
    let trimmed = lower.trim();

    match trimmed {
        "g" | "gram" | "grams" | "grm" => Some(1.0),
        "mg" | "milligram" | "milligrams" => Some(G_PER_MG),
        "mcg" | "ug" | "µg" | "μg" | "microgram" | "micrograms" => Some(G_PER_MCG),
        "kg" | "kilogram" | "kilograms" => Some(G_PER_KG),
        _ => None,
    }
}

/// Get the conversion factor to kilocalories for an energy unit
pub fn kcal_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();
    let trimmed = lower.trim();

    match trimmed {
        "kcal" | "cal" | "calories" | "kilocalories" => Some(1.0),
        "kj" | "kilojoule" | "kilojoules" => Some(1.0 / KJ_PER_KCAL),
        _ => None,
    }
}

/// Get the conversion factor to milliliters for a volume unit
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();
    let trimmed = lower.trim();

    match trimmed {
        "ml" | "mlt" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Some(1.0),
        "l" | "liter" | "liters" | "litre" | "litres" => Some(ML_PER_LITER),
        _ => None,
    }
}

/// Determine the category of a unit string
pub fn categorize_unit(unit: &str) -> UnitCategory {
    if grams_per_unit(unit).is_some() {
        return UnitCategory::Mass;
    }
    if kcal_per_unit(unit).is_some() {
        return UnitCategory::Energy;
    }
    if ml_per_unit(unit).is_some() {
        return UnitCategory::Volume;
    }
    UnitCategory::Other
}

/// Convert an amount reported in `unit` into the tracker's `target` unit
///
/// Returns None when the two units are not in the same dimension, e.g. "IU"
/// into micrograms or grams into kcal.
pub fn convert_amount(amount: f64, unit: &str, target: NutrientUnit) -> Option<f64> {
    match target {
        NutrientUnit::Kcal => kcal_per_unit(unit).map(|f| amount * f),
        NutrientUnit::Gram | NutrientUnit::Milligram | NutrientUnit::Microgram => {
            let to_grams = grams_per_unit(unit)?;
            let target_grams = match target {
                NutrientUnit::Gram => 1.0,
                NutrientUnit::Milligram => G_PER_MG,
                _ => G_PER_MCG,
            };
            Some(amount * to_grams / target_grams)
        }
    }
}
