//! Patient models.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::age_in_years;

/// Error for gender values outside the closed set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("gender must be 'male' or 'female', got {0:?}")]
pub struct InvalidGender(pub String);

/// Patient gender. Closed set; anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Canonical identifier, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = InvalidGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(InvalidGender(other.to_string())),
        }
    }
}

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// UUID, generated locally
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Middle name, absent for patients without one
    pub middle_name: Option<String>,
    /// Date of birth; never in the future
    pub birthday: NaiveDate,
    pub gender: Gender,
    /// Height in centimeters (> 0)
    pub height: f64,
    /// Weight in kilograms (> 0)
    pub weight: f64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Input for creating a patient.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub birthday: NaiveDate,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    /// Doctors to assign together with creation; every id must exist.
    pub doctor_ids: Vec<String>,
}

/// Partial update for a patient.
///
/// `None` fields keep the stored value; `middle_name: Some(None)` clears
/// the middle name.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<Option<String>>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl Patient {
    /// Create a new patient from validated input.
    pub fn new(input: &NewPatient) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            middle_name: input.middle_name.clone(),
            birthday: input.birthday,
            gender: input.gender,
            height: input.height,
            weight: input.weight,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Wire-format display name: `last first middle`, absent parts omitted.
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref() {
            Some(middle) => format!("{} {} {}", self.last_name, self.first_name, middle),
            None => format!("{} {}", self.last_name, self.first_name),
        }
    }

    /// Whole completed years of age on the given date.
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        age_in_years(self.birthday, date)
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl PatientUpdate {
    /// Merge the present fields over a stored record.
    pub fn apply(&self, patient: &mut Patient) {
        if let Some(first_name) = &self.first_name {
            patient.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            patient.last_name = last_name.clone();
        }
        if let Some(middle_name) = &self.middle_name {
            patient.middle_name = middle_name.clone();
        }
        if let Some(birthday) = self.birthday {
            patient.birthday = birthday;
        }
        if let Some(gender) = self.gender {
            patient.gender = gender;
        }
        if let Some(height) = self.height {
            patient.height = height;
        }
        if let Some(weight) = self.weight {
            patient.weight = weight;
        }
    }
}
