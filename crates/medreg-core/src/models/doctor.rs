//! Doctor models.

use serde::{Deserialize, Serialize};

/// A doctor record. Doctors carry no uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    /// UUID, generated locally
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Middle name, absent for doctors without one
    pub middle_name: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Input for creating a doctor.
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
}

/// Partial update for a doctor.
///
/// `None` fields keep the stored value; `middle_name: Some(None)` clears
/// the middle name.
#[derive(Debug, Clone, Default)]
pub struct DoctorUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<Option<String>>,
}

impl Doctor {
    /// Create a new doctor from validated input.
    pub fn new(input: &NewDoctor) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            middle_name: input.middle_name.clone(),
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

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl DoctorUpdate {
    /// Merge the present fields over a stored record.
    pub fn apply(&self, doctor: &mut Doctor) {
        if let Some(first_name) = &self.first_name {
            doctor.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            doctor.last_name = last_name.clone();
        }
        if let Some(middle_name) = &self.middle_name {
            doctor.middle_name = middle_name.clone();
        }
    }
}
