//! BMR calculation history records.

use serde::{Deserialize, Serialize};

use crate::metrics::{round2, BmrFormula};

/// One entry of a patient's BMR history.
///
/// Immutable once created; rows accumulate per patient and per formula.
/// `result` holds the value exactly as computed; display rounding is the
/// caller's concern via [`BmrCalculation::rounded_result`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BmrCalculation {
    /// UUID, generated locally
    pub id: String,
    /// Owning patient
    pub patient_id: String,
    /// Formula the result was computed with
    pub formula: BmrFormula,
    /// Resting energy expenditure in kcal/day, unrounded
    pub result: f64,
    /// Creation timestamp
    pub created_at: String,
}

impl BmrCalculation {
    /// Create a new history entry.
    pub fn new(patient_id: String, formula: BmrFormula, result: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            formula,
            result,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The result rounded to 2 decimal places for display.
    pub fn rounded_result(&self) -> f64 {
        round2(self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_calculation() {
        let calc = BmrCalculation::new("patient-1".into(), BmrFormula::MifflinStJeor, 1730.456);
        assert_eq!(calc.patient_id, "patient-1");
        assert_eq!(calc.result, 1730.456);
        assert_eq!(calc.rounded_result(), 1730.46);
        assert_eq!(calc.id.len(), 36);
    }
}
