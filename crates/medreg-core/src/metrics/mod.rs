//! Pure metric computation: BMI, BMR and age derivation.
//!
//! Everything in this module is synchronous and side-effect-free; callers
//! own validation of presence, persistence of results, and display
//! formatting beyond the 2-decimal rounding helpers here.

mod age;
mod bmi;
mod bmr;

pub use age::*;
pub use bmi::*;
pub use bmr::*;

use thiserror::Error;

/// Metric computation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("unsupported formula {0:?}; supported formulas are: {supported}", supported = SUPPORTED_FORMULAS.join(", "))]
    UnsupportedFormula(String),

    #[error("{field} must be a positive number, got {value}")]
    NonPositiveMeasurement { field: &'static str, value: f64 },
}

pub type MetricsResult<T> = Result<T, MetricsError>;

/// Reject non-positive or non-finite measurements.
pub fn check_positive(field: &'static str, value: f64) -> MetricsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MetricsError::NonPositiveMeasurement { field, value })
    }
}

/// Round a metric value to 2 decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
