//! Portion scaling
//!
//! Catalog amounts are reported per reference portion (usually 100 g); a
//! diary entry stores them scaled to what was actually eaten.

use super::error::{CalcError, CalcResult};
use super::units::{grams_per_unit, ml_per_unit};
use super::vector::NutrientVector;

/// Reference portion when the catalog does not report a serving size
pub const DEFAULT_REFERENCE_PORTION_G: f64 = 100.0;

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Rescale nutrients from `reference_grams` to `portion_grams`
pub fn scale_nutrients_by_portion(
    nutrients: &NutrientVector,
    portion_grams: f64,
    reference_grams: f64,
) -> CalcResult<NutrientVector> {
    if !is_positive(portion_grams) || !is_positive(reference_grams) {
        return Err(CalcError::InvalidPortion {
            portion: portion_grams,
            reference: reference_grams,
        });
    }

    Ok(nutrients.scale(portion_grams / reference_grams))
}

/// Reference portion in grams for a catalog serving size and unit
///
/// Missing or non-positive sizes use the 100 g default. Volumes are taken at
/// water density. An unrecognized unit keeps the raw size as grams.
pub fn reference_portion_grams(serving_size: Option<f64>, serving_unit: Option<&str>) -> f64 {
    let size = match serving_size {
        Some(s) if is_positive(s) => s,
        _ => return DEFAULT_REFERENCE_PORTION_G,
    };

    let unit = match serving_unit.map(str::trim) {
        Some(u) if !u.is_empty() => u,
        _ => return size,
    };

    if let Some(factor) = grams_per_unit(unit) {
        return size * factor;
    }

    if let Some(factor) = ml_per_unit(unit) {
        tracing::debug!("Treating {} {} as {} g", size, unit, size * factor);
        return size * factor;
    }

    tracing::warn!(
        "Unrecognized serving unit '{}'. Treating {} as grams.",
        unit,
        size
    );
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::nutrients::Nutrient;

    fn sample() -> NutrientVector {
        [
            (Nutrient::Calories, 165.0),
            (Nutrient::Protein, 31.0),
            (Nutrient::Iron, 1.04),
        ]
        .into_iter()
        .collect()
    }

    fn assert_close(a: &NutrientVector, b: &NutrientVector) {
        assert_eq!(a.len(), b.len());
        for (n, amount) in a.iter() {
            assert!((amount - b.get(n)).abs() < 1e-9, "{}: {} vs {}", n, amount, b.get(n));
        }
    }

    #[test]
    fn test_scale_by_portion() {
        let scaled = scale_nutrients_by_portion(&sample(), 150.0, DEFAULT_REFERENCE_PORTION_G).unwrap();
        assert!((scaled.get(Nutrient::Calories) - 247.5).abs() < 1e-9);
        assert!((scaled.get(Nutrient::Protein) - 46.5).abs() < 1e-9);
    }

    #[test]
    fn test_same_portion_is_identity() {
        for p in [1.0, 28.35, 100.0, 452.0] {
            let scaled = scale_nutrients_by_portion(&sample(), p, p).unwrap();
            assert_close(&scaled, &sample());
        }
    }

    #[test]
    fn test_scaling_is_linear() {
        let p = 80.0;
        let k = 2.5;
        let once = scale_nutrients_by_portion(&sample(), p, 100.0).unwrap();
        let twice = scale_nutrients_by_portion(&once, k, 1.0).unwrap();
        let direct = scale_nutrients_by_portion(&sample(), p * k, 100.0).unwrap();
        assert_close(&twice, &direct);
    }

    #[test]
    fn test_invalid_portions() {
        for (portion, reference) in [(0.0, 100.0), (-5.0, 100.0), (50.0, 0.0), (f64::NAN, 100.0)] {
            let result = scale_nutrients_by_portion(&sample(), portion, reference);
            assert!(matches!(result, Err(CalcError::InvalidPortion { .. })));
        }
    }

    #[test]
    fn test_reference_portion_grams() {
        assert_eq!(reference_portion_grams(None, None), 100.0);
        assert_eq!(reference_portion_grams(Some(0.0), Some("g")), 100.0);
        assert_eq!(reference_portion_grams(Some(28.0), Some("GRM")), 28.0);
        assert_eq!(reference_portion_grams(Some(0.5), Some("kg")), 500.0);
        assert_eq!(reference_portion_grams(Some(240.0), Some("MLT")), 240.0);
        assert_eq!(reference_portion_grams(Some(2.0), Some("cup")), 2.0);
        assert_eq!(reference_portion_grams(Some(30.0), None), 30.0);
    }
}
