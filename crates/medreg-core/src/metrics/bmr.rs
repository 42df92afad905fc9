//! Basal metabolic rate formulas.

use serde::{Deserialize, Serialize};

use super::{MetricsError, MetricsResult};
use crate::models::Gender;

/// Canonical formula identifiers, in the order they are reported to callers.
pub const SUPPORTED_FORMULAS: [&str; 2] = ["mifflin_st_jeor", "harris_benedict"];

/// A BMR estimation formula.
///
/// The set is closed: dispatch is an exhaustive match, and anything outside
/// it fails at parse time rather than at computation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrFormula {
    MifflinStJeor,
    HarrisBenedict,
}

impl BmrFormula {
    /// Parse a formula identifier, case-insensitively.
    pub fn parse(s: &str) -> MetricsResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "mifflin_st_jeor" => Ok(BmrFormula::MifflinStJeor),
            "harris_benedict" => Ok(BmrFormula::HarrisBenedict),
            _ => Err(MetricsError::UnsupportedFormula(s.to_string())),
        }
    }

    /// Canonical identifier, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            BmrFormula::MifflinStJeor => "mifflin_st_jeor",
            BmrFormula::HarrisBenedict => "harris_benedict",
        }
    }

    /// Estimated resting energy expenditure in kcal/day, unrounded.
    pub fn compute(&self, gender: Gender, weight_kg: f64, height_cm: f64, age_years: i32) -> f64 {
        let age = f64::from(age_years);
        match (self, gender) {
            (BmrFormula::MifflinStJeor, Gender::Male) => {
                10.0 * weight_kg + 6.25 * height_cm - 5.0 * age + 5.0
            }
            (BmrFormula::MifflinStJeor, Gender::Female) => {
                10.0 * weight_kg + 6.25 * height_cm - 5.0 * age - 161.0
            }
            (BmrFormula::HarrisBenedict, Gender::Male) => {
                88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age
            }
            (BmrFormula::HarrisBenedict, Gender::Female) => {
                447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age
            }
        }
    }
}
