//! Body mass index.

use serde::{Deserialize, Serialize};

use super::{check_positive, round2, MetricsResult};

/// Standard clinical BMI category.
///
/// Bands are half-open: the lower bound belongs to the band it opens, so
/// exactly 25.0 is Overweight while 24.999 is still Normal weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    #[serde(rename = "Underweight")]
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Obesity")]
    Obesity,
}

impl BmiCategory {
    /// Clinical label, as serialized on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obesity => "Obesity",
        }
    }

    /// Categorize an unrounded BMI value.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::NormalWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obesity
        }
    }
}

/// A computed BMI with its category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiReport {
    /// Weight / height² in kg/m², rounded to 2 decimal places
    pub bmi: f64,
    /// Category derived from the unrounded value
    pub category: BmiCategory,
}

/// Compute BMI from weight in kilograms and height in centimeters.
///
/// The category is derived before rounding, so values like 24.996 land in
/// Normal weight even though they display as 25.0.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> MetricsResult<BmiReport> {
    check_positive("weight", weight_kg)?;
    check_positive("height", height_cm)?;

    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);

    Ok(BmiReport {
        bmi: round2(bmi),
        category: BmiCategory::from_bmi(bmi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsError;
    use proptest::prelude::*;

    #[test]
    fn test_computes_and_rounds() {
        let report = compute_bmi(75.0, 180.0).unwrap();
        assert_eq!(report.bmi, 23.15); // 75 / 1.8^2 = 23.1481...
        assert_eq!(report.category, BmiCategory::NormalWeight);
    }

    #[test]
    fn test_band_boundaries_are_exact() {
        // Height 200cm gives height_m^2 = 4.0, so weight / 4 is exact.
        assert_eq!(compute_bmi(73.9, 200.0).unwrap().category, BmiCategory::Underweight);
        assert_eq!(compute_bmi(74.0, 200.0).unwrap().category, BmiCategory::NormalWeight);
        assert_eq!(compute_bmi(99.6, 200.0).unwrap().category, BmiCategory::NormalWeight);
        assert_eq!(compute_bmi(100.0, 200.0).unwrap().category, BmiCategory::Overweight);
        assert_eq!(compute_bmi(119.6, 200.0).unwrap().category, BmiCategory::Overweight);
        assert_eq!(compute_bmi(120.0, 200.0).unwrap().category, BmiCategory::Obesity);
    }

    #[test]
    fn test_category_from_unrounded_value() {
        // 99.99 / 4 = 24.9975: displays as 25.0 but stays Normal weight.
        let report = compute_bmi(99.99, 200.0).unwrap();
        assert_eq!(report.bmi, 25.0);
        assert_eq!(report.category, BmiCategory::NormalWeight);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        assert!(matches!(
            compute_bmi(0.0, 180.0),
            Err(MetricsError::NonPositiveMeasurement { field: "weight", .. })
        ));
        assert!(matches!(
            compute_bmi(75.0, -1.0),
            Err(MetricsError::NonPositiveMeasurement { field: "height", .. })
        ));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(BmiCategory::from_bmi(17.0).label(), "Underweight");
        assert_eq!(BmiCategory::from_bmi(31.2).label(), "Obesity");
    }

    proptest! {
        // Heavier never lowers BMI at fixed height.
        #[test]
        fn prop_monotonic_in_weight(
            height in 100.0f64..230.0,
            weight in 30.0f64..200.0,
            delta in 0.0f64..50.0,
        ) {
            let base = compute_bmi(weight, height).unwrap().bmi;
            let more = compute_bmi(weight + delta, height).unwrap().bmi;
            prop_assert!(more >= base);
        }

        // Taller never raises BMI at fixed weight.
        #[test]
        fn prop_monotonic_in_height(
            height in 100.0f64..230.0,
            weight in 30.0f64..200.0,
            delta in 0.0f64..50.0,
        ) {
            let base = compute_bmi(weight, height).unwrap().bmi;
            let taller = compute_bmi(weight, height + delta).unwrap().bmi;
            prop_assert!(taller <= base);
        }
    }
}
