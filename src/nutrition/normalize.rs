//! Catalog normalization
//!
//! Maps FoodData Central nutrient names onto the tracked vocabulary. The
//! catalog reports dozens of nutrients that are not tracked; those have no
//! mapping and are dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{CalcError, CalcResult};
use super::nutrients::Nutrient;
use super::units::convert_amount;
use super::vector::NutrientVector;

/// A nutrient amount as reported by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogNutrient {
    pub amount: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

impl CatalogNutrient {
    pub fn new(amount: f64, unit: impl Into<String>) -> Self {
        Self {
            amount,
            unit: Some(unit.into()),
        }
    }
}

/// Tracked nutrient for a catalog nutrient name, if it is tracked
pub fn catalog_nutrient(name: &str) -> Option<Nutrient> {
    let nutrient = match name.trim() {
        "Energy" => Nutrient::Calories,
        "Protein" => Nutrient::Protein,
        "Total lipid (fat)" => Nutrient::Fat,
        "Carbohydrate, by difference" => Nutrient::Carbohydrates,
        "Fiber, total dietary" => Nutrient::Fiber,
        "Sugars, total including NLEA" => Nutrient::Sugar,
        "Sodium, Na" => Nutrient::Sodium,
        "Calcium, Ca" => Nutrient::Calcium,
        "Iron, Fe" => Nutrient::Iron,
        "Magnesium, Mg" => Nutrient::Magnesium,
        "Phosphorus, P" => Nutrient::Phosphorus,
        "Potassium, K" => Nutrient::Potassium,
        "Zinc, Zn" => Nutrient::Zinc,
        "Copper, Cu" => Nutrient::Copper,
        "Manganese, Mn" => Nutrient::Manganese,
        "Selenium, Se" => Nutrient::Selenium,
        "Vitamin C, total ascorbic acid" => Nutrient::VitaminC,
        "Thiamin" => Nutrient::VitaminB1,
        "Riboflavin" => Nutrient::VitaminB2,
        "Niacin" => Nutrient::VitaminB3,
        "Pantothenic acid" => Nutrient::VitaminB5,
        "Vitamin B-6" => Nutrient::VitaminB6,
        "Folate, total" => Nutrient::Folate,
        "Vitamin B-12" => Nutrient::VitaminB12,
        "Vitamin A, RAE" => Nutrient::VitaminA,
        "Vitamin E (alpha-tocopherol)" => Nutrient::VitaminE,
        "Vitamin D (D2 + D3)" => Nutrient::VitaminD,
        "Vitamin K (phylloquinone)" => Nutrient::VitaminK,
        "Cholesterol" => Nutrient::Cholesterol,
        "Fatty acids, total saturated" => Nutrient::SaturatedFat,
        "Fatty acids, total monounsaturated" => Nutrient::MonounsaturatedFat,
        "Fatty acids, total polyunsaturated" => Nutrient::PolyunsaturatedFat,
        _ => return None,
    };
    Some(nutrient)
}

/// Amount expressed in the nutrient's own unit
///
/// Amounts without a unit, or in a unit of another dimension (IU), are kept
/// as reported.
fn amount_in_tracked_unit(nutrient: Nutrient, reported: &CatalogNutrient) -> f64 {
    match reported.unit.as_deref() {
        Some(unit) if !unit.trim().is_empty() => {
            convert_amount(reported.amount, unit, nutrient.unit()).unwrap_or_else(|| {
                tracing::debug!(
                    "No conversion from '{}' to {} for {}, keeping amount",
                    unit,
                    nutrient.unit().as_str(),
                    nutrient
                );
                reported.amount
            })
        }
        _ => reported.amount,
    }
}

/// Normalize catalog nutrients, dropping untracked names
pub fn normalize_nutrients(nutrients: &BTreeMap<String, CatalogNutrient>) -> NutrientVector {
    let mut normalized = NutrientVector::new();

    for (name, reported) in nutrients {
        if let Some(nutrient) = catalog_nutrient(name) {
            normalized.set(nutrient, amount_in_tracked_unit(nutrient, reported));
        }
    }

    normalized
}

/// Like [`normalize_nutrients`], but an empty result is an error
pub fn normalize_nutrients_strict(
    nutrients: &BTreeMap<String, CatalogNutrient>,
) -> CalcResult<NutrientVector> {
    let normalized = normalize_nutrients(nutrients);
    if normalized.is_empty() {
        return Err(CalcError::MissingNutrientData {
            catalog_empty: nutrients.is_empty(),
        });
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_names_are_dropped() {
        let mut raw = BTreeMap::new();
        raw.insert("Energy".to_string(), CatalogNutrient::new(200.0, "kcal"));
        raw.insert(
            "Unknown Nutrient X".to_string(),
            CatalogNutrient { amount: 5.0, unit: None },
        );

        let v = normalize_nutrients(&raw);
        assert_eq!(v.len(), 1);
        assert_eq!(v.get(Nutrient::Calories), 200.0);
    }

    #[test]
    fn test_every_tracked_nutrient_has_a_catalog_name() {
        let mapped: std::collections::BTreeSet<Nutrient> = [
            "Energy", "Protein", "Total lipid (fat)", "Carbohydrate, by difference",
            "Fiber, total dietary", "Sugars, total including NLEA", "Sodium, Na",
            "Calcium, Ca", "Iron, Fe", "Magnesium, Mg", "Phosphorus, P", "Potassium, K",
            "Zinc, Zn", "Copper, Cu", "Manganese, Mn", "Selenium, Se",
            "Vitamin C, total ascorbic acid", "Thiamin", "Riboflavin", "Niacin",
            "Pantothenic acid", "Vitamin B-6", "Folate, total", "Vitamin B-12",
            "Vitamin A, RAE", "Vitamin E (alpha-tocopherol)", "Vitamin D (D2 + D3)",
            "Vitamin K (phylloquinone)", "Cholesterol", "Fatty acids, total saturated",
            "Fatty acids, total monounsaturated", "Fatty acids, total polyunsaturated",
        ]
        .iter()
        .filter_map(|name| catalog_nutrient(name))
        .collect();
        assert_eq!(mapped.len(), Nutrient::ALL.len());
    }

    #[test]
    fn test_units_are_converted() {
        let mut raw = BTreeMap::new();
        raw.insert("Energy".to_string(), CatalogNutrient::new(836.8, "kJ"));
        raw.insert("Sodium, Na".to_string(), CatalogNutrient::new(0.4, "G"));
        raw.insert("Vitamin D (D2 + D3)".to_string(), CatalogNutrient::new(2.5, "UG"));
        raw.insert("Vitamin A, RAE".to_string(), CatalogNutrient::new(300.0, "IU"));

        let v = normalize_nutrients(&raw);
        assert!((v.get(Nutrient::Calories) - 200.0).abs() < 1e-9);
        assert!((v.get(Nutrient::Sodium) - 400.0).abs() < 1e-9);
        assert!((v.get(Nutrient::VitaminD) - 2.5).abs() < 1e-9);
        assert_eq!(v.get(Nutrient::VitaminA), 300.0);
    }

    #[test]
    fn test_strict_distinguishes_empty_catalog() {
        let empty = BTreeMap::new();
        assert_eq!(
            normalize_nutrients_strict(&empty),
            Err(CalcError::MissingNutrientData { catalog_empty: true })
        );

        let mut untracked = BTreeMap::new();
        untracked.insert("Caffeine".to_string(), CatalogNutrient::new(40.0, "MG"));
        assert_eq!(
            normalize_nutrients_strict(&untracked),
            Err(CalcError::MissingNutrientData { catalog_empty: false })
        );
    }
}
