//! Measurement MCP Tools
//!
//! Record body measurements and report how they change over time.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Measurement, NewMeasurement};
use crate::store::NutritionStore;

/// Response for list_measurements
#[derive(Debug, Serialize)]
pub struct ListMeasurementsResponse {
    pub measurements: Vec<Measurement>,
    pub total: usize,
}

/// Difference between two measurements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementChange {
    pub since: NaiveDate,
    pub days: i64,
    pub weight_kg: f64,
    pub body_fat_percent: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub waist_cm: Option<f64>,
}

/// Response for get_measurement_trend
#[derive(Debug, Serialize)]
pub struct MeasurementTrend {
    pub latest: Option<Measurement>,
    pub since_previous: Option<MeasurementChange>,
    pub since_first: Option<MeasurementChange>,
    pub total_measurements: usize,
}

fn diff(latest: Option<f64>, earlier: Option<f64>) -> Option<f64> {
    Some(latest? - earlier?)
}

/// Change from `earlier` to `latest`
pub fn measurement_change(latest: &Measurement, earlier: &Measurement) -> MeasurementChange {
    MeasurementChange {
        since: earlier.date,
        days: (latest.date - earlier.date).num_days(),
        weight_kg: latest.weight_kg - earlier.weight_kg,
        body_fat_percent: diff(latest.body_fat_percent, earlier.body_fat_percent),
        muscle_mass_kg: diff(latest.muscle_mass_kg, earlier.muscle_mass_kg),
        waist_cm: diff(latest.waist_cm, earlier.waist_cm),
    }
}

pub fn add_measurement(
    store: &dyn NutritionStore,
    record: NewMeasurement,
) -> Result<Measurement, String> {
    record.validate().map_err(|e| e.to_string())?;
    store
        .add_measurement(record)
        .map_err(|e| format!("Failed to record measurement: {}", e))
}

pub fn list_measurements(
    store: &dyn NutritionStore,
    limit: Option<usize>,
) -> Result<ListMeasurementsResponse, String> {
    let mut measurements = store
        .list_measurements()
        .map_err(|e| format!("Failed to list measurements: {}", e))?;
    let total = measurements.len();
    if let Some(limit) = limit {
        measurements.truncate(limit);
    }

    Ok(ListMeasurementsResponse {
        measurements,
        total,
    })
}

pub fn get_measurement_trend(store: &dyn NutritionStore) -> Result<MeasurementTrend, String> {
    let history = store
        .list_measurements()
        .map_err(|e| format!("Failed to list measurements: {}", e))?;

    let latest = history.first();
    let since_previous = match (latest, history.get(1)) {
        (Some(l), Some(p)) => Some(measurement_change(l, p)),
        _ => None,
    };
    let since_first = match (latest, history.last()) {
        (Some(l), Some(f)) if history.len() > 1 => Some(measurement_change(l, f)),
        _ => None,
    };

    Ok(MeasurementTrend {
        latest: latest.cloned(),
        since_previous,
        since_first,
        total_measurements: history.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn record(date: &str, weight: f64, body_fat: Option<f64>) -> NewMeasurement {
        NewMeasurement {
            date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            weight_kg: weight,
            body_fat_percent: body_fat,
            ..NewMeasurement::default()
        }
    }

    #[test]
    fn test_invalid_measurement_not_stored() {
        let store = MemoryStore::new();
        let err = add_measurement(&store, record("2025-01-01", 0.0, None)).unwrap_err();
        assert!(err.contains("weight_kg"));
        let err = add_measurement(&store, record("2025-01-01", 80.0, Some(140.0))).unwrap_err();
        assert!(err.contains("body_fat_percent"));
        assert_eq!(list_measurements(&store, None).unwrap().total, 0);
    }

    #[test]
    fn test_list_with_limit() {
        let store = MemoryStore::new();
        for (d, w) in [("2025-01-01", 82.0), ("2025-01-08", 81.0), ("2025-01-15", 80.5)] {
            add_measurement(&store, record(d, w, None)).unwrap();
        }
        let response = list_measurements(&store, Some(2)).unwrap();
        assert_eq!(response.total, 3);
        assert_eq!(response.measurements.len(), 2);
        assert_eq!(response.measurements[0].weight_kg, 80.5);
    }

    #[test]
    fn test_trend() {
        let store = MemoryStore::new();
        let trend = get_measurement_trend(&store).unwrap();
        assert!(trend.latest.is_none());
        assert!(trend.since_previous.is_none());

        add_measurement(&store, record("2025-01-01", 82.0, Some(25.0))).unwrap();
        let trend = get_measurement_trend(&store).unwrap();
        assert_eq!(trend.total_measurements, 1);
        assert!(trend.since_first.is_none());

        add_measurement(&store, record("2025-01-08", 81.0, None)).unwrap();
        add_measurement(&store, record("2025-01-15", 80.5, Some(24.0))).unwrap();

        let trend = get_measurement_trend(&store).unwrap();
        let previous = trend.since_previous.unwrap();
        assert!((previous.weight_kg + 0.5).abs() < 1e-9);
        assert_eq!(previous.days, 7);
        assert_eq!(previous.body_fat_percent, None);

        let first = trend.since_first.unwrap();
        assert!((first.weight_kg + 1.5).abs() < 1e-9);
        assert_eq!(first.days, 14);
        assert_eq!(first.body_fat_percent, Some(-1.0));
    }
}
