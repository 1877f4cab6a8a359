//! Nutrient vocabulary and reference table
//!
//! Every nutrient the tracker knows about, with its display name, unit,
//! reference daily value, and category.

use serde::{Deserialize, Serialize};

/// Unit a nutrient amount is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientUnit {
    /// Kilocalories (energy)
    Kcal,
    /// Grams
    Gram,
    /// Milligrams
    Milligram,
    /// Micrograms
    Microgram,
}

impl NutrientUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientUnit::Kcal => "kcal",
            NutrientUnit::Gram => "g",
            NutrientUnit::Milligram => "mg",
            NutrientUnit::Microgram => "mcg",
        }
    }
}

/// Grouping used for progress reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NutrientCategory {
    Macronutrients,
    Vitamins,
    Minerals,
    Other,
}

impl NutrientCategory {
    pub const ALL: [NutrientCategory; 4] = [
        NutrientCategory::Macronutrients,
        NutrientCategory::Vitamins,
        NutrientCategory::Minerals,
        NutrientCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientCategory::Macronutrients => "Macronutrients",
            NutrientCategory::Vitamins => "Vitamins",
            NutrientCategory::Minerals => "Minerals",
            NutrientCategory::Other => "Other",
        }
    }

    /// Nutrients in this category, in display order
    pub fn nutrients(&self) -> impl Iterator<Item = Nutrient> + '_ {
        Nutrient::ALL.iter().copied().filter(move |n| n.category() == *self)
    }
}

/// Tracked nutrient identifier
///
/// Serialized as the snake_case id (`vitamin_b12`, `saturated_fat`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calories,
    Protein,
    Fat,
    Carbohydrates,
    Fiber,
    Sugar,
    VitaminA,
    VitaminC,
    VitaminD,
    VitaminE,
    VitaminK,
    VitaminB1,
    VitaminB2,
    VitaminB3,
    VitaminB5,
    VitaminB6,
    VitaminB12,
    Folate,
    Calcium,
    Iron,
    Magnesium,
    Phosphorus,
    Potassium,
    Sodium,
    Zinc,
    Copper,
    Manganese,
    Selenium,
    Cholesterol,
    SaturatedFat,
    MonounsaturatedFat,
    PolyunsaturatedFat,
}

impl Nutrient {
    pub const ALL: [Nutrient; 32] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Carbohydrates,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::VitaminD,
        Nutrient::VitaminE,
        Nutrient::VitaminK,
        Nutrient::VitaminB1,
        Nutrient::VitaminB2,
        Nutrient::VitaminB3,
        Nutrient::VitaminB5,
        Nutrient::VitaminB6,
        Nutrient::VitaminB12,
        Nutrient::Folate,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Magnesium,
        Nutrient::Phosphorus,
        Nutrient::Potassium,
        Nutrient::Sodium,
        Nutrient::Zinc,
        Nutrient::Copper,
        Nutrient::Manganese,
        Nutrient::Selenium,
        Nutrient::Cholesterol,
        Nutrient::SaturatedFat,
        Nutrient::MonounsaturatedFat,
        Nutrient::PolyunsaturatedFat,
    ];

    /// The four nutrients always shown in a daily progress report
    pub const MACROS: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbohydrates,
        Nutrient::Fat,
    ];

    /// Stable snake_case identifier
    pub fn id(&self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Fat => "fat",
            Nutrient::Carbohydrates => "carbohydrates",
            Nutrient::Fiber => "fiber",
            Nutrient::Sugar => "sugar",
            Nutrient::VitaminA => "vitamin_a",
            Nutrient::VitaminC => "vitamin_c",
            Nutrient::VitaminD => "vitamin_d",
            Nutrient::VitaminE => "vitamin_e",
            Nutrient::VitaminK => "vitamin_k",
            Nutrient::VitaminB1 => "vitamin_b1",
            Nutrient::VitaminB2 => "vitamin_b2",
            Nutrient::VitaminB3 => "vitamin_b3",
            Nutrient::VitaminB5 => "vitamin_b5",
            Nutrient::VitaminB6 => "vitamin_b6",
            Nutrient::VitaminB12 => "vitamin_b12",
            Nutrient::Folate => "folate",
            Nutrient::Calcium => "calcium",
            Nutrient::Iron => "iron",
            Nutrient::Magnesium => "magnesium",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::Potassium => "potassium",
            Nutrient::Sodium => "sodium",
            Nutrient::Zinc => "zinc",
            Nutrient::Copper => "copper",
            Nutrient::Manganese => "manganese",
            Nutrient::Selenium => "selenium",
            Nutrient::Cholesterol => "cholesterol",
            Nutrient::SaturatedFat => "saturated_fat",
            Nutrient::MonounsaturatedFat => "monounsaturated_fat",
            Nutrient::PolyunsaturatedFat => "polyunsaturated_fat",
        }
    }

    /// Parse a snake_case identifier
    pub fn from_id(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Nutrient::ALL.iter().copied().find(|n| n.id() == lower)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Nutrient::Calories => "Calories",
            Nutrient::Protein => "Protein",
            Nutrient::Fat => "Fat",
            Nutrient::Carbohydrates => "Carbohydrates",
            Nutrient::Fiber => "Fiber",
            Nutrient::Sugar => "Sugar",
            Nutrient::VitaminA => "Vitamin A",
            Nutrient::VitaminC => "Vitamin C",
            Nutrient::VitaminD => "Vitamin D",
            Nutrient::VitaminE => "Vitamin E",
            Nutrient::VitaminK => "Vitamin K",
            Nutrient::VitaminB1 => "Thiamin (B1)",
            Nutrient::VitaminB2 => "Riboflavin (B2)",
            Nutrient::VitaminB3 => "Niacin (B3)",
            Nutrient::VitaminB5 => "Pantothenic Acid (B5)",
            Nutrient::VitaminB6 => "Vitamin B6",
            Nutrient::VitaminB12 => "Vitamin B12",
            Nutrient::Folate => "Folate",
            Nutrient::Calcium => "Calcium",
            Nutrient::Iron => "Iron",
            Nutrient::Magnesium => "Magnesium",
            Nutrient::Phosphorus => "Phosphorus",
            Nutrient::Potassium => "Potassium",
            Nutrient::Sodium => "Sodium",
            Nutrient::Zinc => "Zinc",
            Nutrient::Copper => "Copper",
            Nutrient::Manganese => "Manganese",
            Nutrient::Selenium => "Selenium",
            Nutrient::Cholesterol => "Cholesterol",
            Nutrient::SaturatedFat => "Saturated Fat",
            Nutrient::MonounsaturatedFat => "Monounsaturated Fat",
            Nutrient::PolyunsaturatedFat => "Polyunsaturated Fat",
        }
    }

    pub fn unit(&self) -> NutrientUnit {
        use NutrientUnit::*;
        match self {
            Nutrient::Calories => Kcal,
            Nutrient::Protein
            | Nutrient::Fat
            | Nutrient::Carbohydrates
            | Nutrient::Fiber
            | Nutrient::Sugar
            | Nutrient::SaturatedFat
            | Nutrient::MonounsaturatedFat
            | Nutrient::PolyunsaturatedFat => Gram,
            Nutrient::VitaminA
            | Nutrient::VitaminD
            | Nutrient::VitaminK
            | Nutrient::VitaminB12
            | Nutrient::Folate
            | Nutrient::Selenium => Microgram,
            _ => Milligram,
        }
    }

    /// Adult reference daily value, in [`Nutrient::unit`]
    ///
    /// Sodium and cholesterol are upper limits. The fatty-acid subtotals
    /// have no reference value.
    pub fn reference_daily_value(&self) -> Option<f64> {
        let value = match self {
            Nutrient::Calories => 2000.0,
            Nutrient::Protein => 50.0,
            Nutrient::Fat => 65.0,
            Nutrient::Carbohydrates => 300.0,
            Nutrient::Fiber => 25.0,
            Nutrient::Sugar => 50.0,
            Nutrient::VitaminA => 900.0,
            Nutrient::VitaminC => 90.0,
            Nutrient::VitaminD => 20.0,
            Nutrient::VitaminE => 15.0,
            Nutrient::VitaminK => 120.0,
            Nutrient::VitaminB1 => 1.2,
            Nutrient::VitaminB2 => 1.3,
            Nutrient::VitaminB3 => 16.0,
            Nutrient::VitaminB5 => 5.0,
            Nutrient::VitaminB6 => 1.3,
            Nutrient::VitaminB12 => 2.4,
            Nutrient::Folate => 400.0,
            Nutrient::Calcium => 1000.0,
            Nutrient::Iron => 8.0,
            Nutrient::Magnesium => 400.0,
            Nutrient::Phosphorus => 700.0,
            Nutrient::Potassium => 3500.0,
            Nutrient::Sodium => 2300.0,
            Nutrient::Zinc => 11.0,
            Nutrient::Copper => 0.9,
            Nutrient::Manganese => 2.3,
            Nutrient::Selenium => 55.0,
            Nutrient::Cholesterol => 300.0,
            Nutrient::SaturatedFat => 20.0,
            Nutrient::MonounsaturatedFat | Nutrient::PolyunsaturatedFat => return None,
        };
        Some(value)
    }

    pub fn category(&self) -> NutrientCategory {
        match self {
            Nutrient::Calories
            | Nutrient::Protein
            | Nutrient::Fat
            | Nutrient::Carbohydrates
            | Nutrient::Fiber
            | Nutrient::Sugar => NutrientCategory::Macronutrients,
            Nutrient::VitaminA
            | Nutrient::VitaminC
            | Nutrient::VitaminD
            | Nutrient::VitaminE
            | Nutrient::VitaminK
            | Nutrient::VitaminB1
            | Nutrient::VitaminB2
            | Nutrient::VitaminB3
            | Nutrient::VitaminB5
            | Nutrient::VitaminB6
            | Nutrient::VitaminB12
            | Nutrient::Folate => NutrientCategory::Vitamins,
            Nutrient::Calcium
            | Nutrient::Iron
            | Nutrient::Magnesium
            | Nutrient::Phosphorus
            | Nutrient::Potassium
            | Nutrient::Sodium
            | Nutrient::Zinc
            | Nutrient::Copper
            | Nutrient::Manganese
            | Nutrient::Selenium => NutrientCategory::Minerals,
            Nutrient::Cholesterol
            | Nutrient::SaturatedFat
            | Nutrient::MonounsaturatedFat
            | Nutrient::PolyunsaturatedFat => NutrientCategory::Other,
        }
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
