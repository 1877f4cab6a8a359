//! Goal calculation
//!
//! Derives energy expenditure and per-nutrient daily targets from a user
//! profile (Mifflin-St Jeor BMR, activity-scaled TDEE, fixed macro split).

use serde::{Deserialize, Serialize};

use super::error::{CalcError, CalcResult};
use super::nutrients::Nutrient;
use super::vector::NutrientVector;

/// Calories per gram of protein and carbohydrate
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Calories per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Share of goal calories from each macronutrient
pub const PROTEIN_CALORIE_SHARE: f64 = 0.15;
pub const FAT_CALORIE_SHARE: f64 = 0.30;
pub const CARBS_CALORIE_SHARE: f64 = 0.55;

/// Daily calorie adjustment for lose/gain goals
pub const GOAL_CALORIE_ADJUSTMENT: f64 = 500.0;

/// Gender as used by the BMR formula and iron target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Parse user input. Anything other than "male" takes the female branch.
    pub fn from_input(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("male") {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

/// Activity level for TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }

    /// Parse user input. Unknown levels fall back to moderate.
    pub fn from_input(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "very_active" => ActivityLevel::VeryActive,
            "extremely_active" => ActivityLevel::ExtremelyActive,
            other => {
                tracing::warn!("Unknown activity level '{}', using moderate", other);
                ActivityLevel::Moderate
            }
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }
}

/// Body weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightGoal {
    Lose,
    Maintain,
    Gain,
}

impl WeightGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightGoal::Lose => "lose",
            WeightGoal::Maintain => "maintain",
            WeightGoal::Gain => "gain",
        }
    }

    /// Parse user input. Unlike gender and activity there is no fallback.
    pub fn parse(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "lose" => Ok(WeightGoal::Lose),
            "maintain" => Ok(WeightGoal::Maintain),
            "gain" => Ok(WeightGoal::Gain),
            other => Err(CalcError::profile(
                "goal",
                format!("'{}' is not one of lose, maintain, gain", other),
            )),
        }
    }
}

/// Profile fields the goal calculation depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub goal: WeightGoal,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 30,
            gender: Gender::Male,
            weight_kg: 70.0,
            height_cm: 175.0,
            activity_level: ActivityLevel::Moderate,
            goal: WeightGoal::Maintain,
        }
    }
}

impl UserProfile {
    /// Reject non-positive or non-finite body values
    pub fn validate(&self) -> CalcResult<()> {
        if self.age == 0 {
            return Err(CalcError::profile("age", "must be a positive number of years"));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(CalcError::profile(
                "weight_kg",
                format!("must be > 0, got {}", self.weight_kg),
            ));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(CalcError::profile(
                "height_cm",
                format!("must be > 0, got {}", self.height_cm),
            ));
        }
        Ok(())
    }
}

/// BMI display bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Per-nutrient daily targets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DailyGoals {
    targets: NutrientVector,
}

impl DailyGoals {
    /// Target for a nutrient, if it has one
    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        if self.targets.contains(nutrient) {
            Some(self.targets.get(nutrient))
        } else {
            None
        }
    }

    pub fn calories(&self) -> f64 {
        self.targets.get(Nutrient::Calories)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        self.targets.iter()
    }

    pub fn as_vector(&self) -> &NutrientVector {
        &self.targets
    }
}

/// Everything derived from a profile in one record
#[derive(Debug, Clone, Serialize)]
pub struct GoalReport {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmr: f64,
    pub tdee: f64,
    pub goals: DailyGoals,
}

/// Body mass index from weight and height
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Basal metabolic rate (Mifflin-St Jeor)
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Total daily energy expenditure
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Calorie target after the lose/gain adjustment
pub fn goal_calories(tdee: f64, goal: WeightGoal) -> f64 {
    match goal {
        WeightGoal::Lose => tdee - GOAL_CALORIE_ADJUSTMENT,
        WeightGoal::Maintain => tdee,
        WeightGoal::Gain => tdee + GOAL_CALORIE_ADJUSTMENT,
    }
}

/// Personalized daily targets
///
/// Calories and macros come from the TDEE; everything else starts at the
/// reference table with iron, vitamin D and calcium adjusted for gender/age.
pub fn calculate_daily_goals(tdee: f64, goal: WeightGoal, gender: Gender, age: u32) -> DailyGoals {
    let calories = goal_calories(tdee, goal);

    let mut targets: NutrientVector = Nutrient::ALL
        .iter()
        .filter_map(|n| n.reference_daily_value().map(|v| (*n, v)))
        .collect();

    targets.set(Nutrient::Calories, calories);
    targets.set(
        Nutrient::Protein,
        calories * PROTEIN_CALORIE_SHARE / KCAL_PER_G_PROTEIN,
    );
    targets.set(Nutrient::Fat, calories * FAT_CALORIE_SHARE / KCAL_PER_G_FAT);
    targets.set(
        Nutrient::Carbohydrates,
        calories * CARBS_CALORIE_SHARE / KCAL_PER_G_CARBS,
    );

    let iron = if gender == Gender::Female && age < 51 { 18.0 } else { 8.0 };
    targets.set(Nutrient::Iron, iron);

    if age > 70 {
        targets.set(Nutrient::VitaminD, 20.0);
        targets.set(Nutrient::Calcium, 1200.0);
    }

    DailyGoals { targets }
}

/// Calories implied by a vector's macronutrients
pub fn calculate_meal_calories(nutrients: &NutrientVector) -> f64 {
    nutrients.get(Nutrient::Protein) * KCAL_PER_G_PROTEIN
        + nutrients.get(Nutrient::Fat) * KCAL_PER_G_FAT
        + nutrients.get(Nutrient::Carbohydrates) * KCAL_PER_G_CARBS
}

/// Validate a profile and derive BMI, BMR, TDEE, and daily goals
pub fn derive_goals(profile: &UserProfile) -> CalcResult<GoalReport> {
    profile.validate()?;

    let bmi = calculate_bmi(profile.weight_kg, profile.height_cm);
    let bmr = calculate_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.gender);
    let tdee = calculate_tdee(bmr, profile.activity_level);
    let goals = calculate_daily_goals(tdee, profile.goal, profile.gender, profile.age);

    Ok(GoalReport {
        bmi,
        bmi_category: BmiCategory::from_bmi(bmi),
        bmr,
        tdee,
        goals,
    })
}
