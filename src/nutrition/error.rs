//! Calculation error types
//!
//! All of these are input-validation failures and are never transient.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid profile field '{field}': {reason}")]
    InvalidProfile { field: &'static str, reason: String },

    #[error("Invalid portion: portion {portion} g, reference {reference} g (both must be > 0)")]
    InvalidPortion { portion: f64, reference: f64 },

    #[error("No tracked nutrients in catalog data (catalog reported none: {catalog_empty})")]
    MissingNutrientData {
        /// True when the catalog reported nothing at all, false when it
        /// reported nutrients but none of them map to tracked ones
        catalog_empty: bool,
    },

    #[error("Invalid measurement field '{field}': {reason}")]
    InvalidMeasurement { field: &'static str, reason: String },

    #[error("Invalid date: a {days}-day window ending {end_date} is outside the supported calendar")]
    DateOutOfRange { end_date: NaiveDate, days: u32 },
}

/// Result type for calculation operations
pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    pub(crate) fn profile(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidProfile {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn measurement(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidMeasurement {
            field,
            reason: reason.into(),
        }
    }
}
