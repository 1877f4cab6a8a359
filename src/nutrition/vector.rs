//! Nutrient amount vectors
//!
//! Used by diary entries, daily totals, averages, and goals.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::nutrients::Nutrient;

/// Mapping of nutrient to amount in that nutrient's unit
///
/// Amounts are always finite and non-negative. A nutrient that is not
/// present reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NutrientVector {
    amounts: BTreeMap<Nutrient, f64>,
}

impl NutrientVector {
    /// Create an empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount for a nutrient, zero when absent
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        self.amounts.get(&nutrient).copied().unwrap_or(0.0)
    }

    /// Whether the nutrient has an explicit amount
    pub fn contains(&self, nutrient: Nutrient) -> bool {
        self.amounts.contains_key(&nutrient)
    }

    /// Set an amount. Negative amounts are stored as zero and non-finite
    /// amounts are ignored.
    pub fn set(&mut self, nutrient: Nutrient, amount: f64) {
        if !amount.is_finite() {
            return;
        }
        self.amounts.insert(nutrient, amount.max(0.0));
    }

    /// Add to the existing amount
    pub fn add_amount(&mut self, nutrient: Nutrient, amount: f64) {
        let current = self.get(nutrient);
        self.set(nutrient, current + amount);
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        self.amounts.iter().map(|(n, a)| (*n, *a))
    }

    pub fn nutrients(&self) -> impl Iterator<Item = Nutrient> + '_ {
        self.amounts.keys().copied()
    }

    /// Multiply every amount by a factor
    pub fn scale(&self, multiplier: f64) -> Self {
        self.iter().map(|(n, a)| (n, a * multiplier)).collect()
    }

    /// Element-wise sum with another vector
    pub fn add(&self, other: &NutrientVector) -> Self {
        let mut result = self.clone();
        result += other;
        result
    }
}

impl std::ops::AddAssign<&NutrientVector> for NutrientVector {
    fn add_assign(&mut self, other: &NutrientVector) {
        for (nutrient, amount) in other.iter() {
            self.add_amount(nutrient, amount);
        }
    }
}

impl std::ops::Add for NutrientVector {
    type Output = NutrientVector;

    fn add(mut self, other: NutrientVector) -> NutrientVector {
        self += &other;
        self
    }
}

impl std::ops::Mul<f64> for NutrientVector {
    type Output = NutrientVector;

    fn mul(self, multiplier: f64) -> NutrientVector {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutrientVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientVector::new(), |acc, v| acc + v)
    }
}

impl<'a> std::iter::Sum<&'a NutrientVector> for NutrientVector {
    fn sum<I: Iterator<Item = &'a NutrientVector>>(iter: I) -> Self {
        let mut total = NutrientVector::new();
        for v in iter {
            total += v;
        }
        total
    }
}

impl FromIterator<(Nutrient, f64)> for NutrientVector {
    fn from_iter<I: IntoIterator<Item = (Nutrient, f64)>>(iter: I) -> Self {
        let mut v = NutrientVector::new();
        for (nutrient, amount) in iter {
            v.set(nutrient, amount);
        }
        v
    }
}

// Deserialize through `set` so stored or imported data cannot smuggle in
// negative or non-finite amounts.
impl<'de> Deserialize<'de> for NutrientVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<Nutrient, f64>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reads_as_zero() {
        let v = NutrientVector::new();
        assert_eq!(v.get(Nutrient::Iron), 0.0);
        assert!(!v.contains(Nutrient::Iron));
    }

    #[test]
    fn test_set_clamps_negative_and_ignores_nan() {
        let mut v = NutrientVector::new();
        v.set(Nutrient::Protein, -3.0);
        v.set(Nutrient::Fat, f64::NAN);
        v.set(Nutrient::Sugar, f64::INFINITY);
        assert_eq!(v.get(Nutrient::Protein), 0.0);
        assert!(v.contains(Nutrient::Protein));
        assert!(!v.contains(Nutrient::Fat));
        assert!(!v.contains(Nutrient::Sugar));
    }

    #[test]
    fn test_sum_and_scale() {
        let a: NutrientVector = [(Nutrient::Calories, 100.0), (Nutrient::Protein, 5.0)]
            .into_iter()
            .collect();
        let b: NutrientVector = [(Nutrient::Calories, 50.0), (Nutrient::Iron, 2.0)]
            .into_iter()
            .collect();

        let total: NutrientVector = [a.clone(), b].into_iter().sum();
        assert_eq!(total.get(Nutrient::Calories), 150.0);
        assert_eq!(total.get(Nutrient::Protein), 5.0);
        assert_eq!(total.get(Nutrient::Iron), 2.0);

        let doubled = a * 2.0;
        assert_eq!(doubled.get(Nutrient::Calories), 200.0);
    }

    #[test]
    fn test_json_shape() {
        let v: NutrientVector = [(Nutrient::VitaminC, 12.5)].into_iter().collect();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"vitamin_c":12.5}"#);

        let parsed: NutrientVector =
            serde_json::from_str(r#"{"calories":200.0,"iron":-1.0}"#).unwrap();
        assert_eq!(parsed.get(Nutrient::Calories), 200.0);
        assert_eq!(parsed.get(Nutrient::Iron), 0.0);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let parsed: Result<NutrientVector, _> = serde_json::from_str(r#"{"vitamin_z":1.0}"#);
        assert!(parsed.is_err());
    }
}
