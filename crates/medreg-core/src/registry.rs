//! Invariant-preserving registry operations.
//!
//! [`Registry`] is the write surface of the crate: it validates inputs,
//! delegates uniqueness and cascades to the database, and composes the
//! pure metric functions. Every operation is request-scoped; nothing is
//! cached between calls.

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::metrics::{check_positive, BmrFormula, MetricsError};
use crate::models::{
    BmrCalculation, Doctor, DoctorUpdate, InvalidGender, NewDoctor, NewPatient, Patient,
    PatientUpdate,
};

/// Registry errors. Each variant pinpoints the offending field or
/// identifier; nothing is swallowed or retried internally.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    InvalidGender(#[from] InvalidGender),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("birthday {0} is in the future")]
    FutureBirthday(NaiveDate),

    #[error("patient with the same name and birthday already exists")]
    DuplicatePatient,

    #[error("patient not found: {0}")]
    PatientNotFound(String),

    #[error("doctor not found: {0}")]
    DoctorNotFound(String),

    #[error("doctors not found: {}", .0.join(", "))]
    UnknownDoctors(Vec<String>),

    #[error("doctor {doctor_id} is not assigned to patient {patient_id}")]
    LinkNotFound {
        patient_id: String,
        doctor_id: String,
    },

    #[error("database error: {0}")]
    Database(DbError),
}

impl From<DbError> for RegistryError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Duplicate(_) => RegistryError::DuplicatePatient,
            other => RegistryError::Database(other),
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// The patient/doctor registry.
pub struct Registry<'a> {
    db: &'a Database,
    today: NaiveDate,
}

impl<'a> Registry<'a> {
    /// Create a registry using today's UTC date as the reference date.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            today: Utc::now().date_naive(),
        }
    }

    /// Pin the reference date used for age math and birthday validation.
    pub fn with_today(db: &'a Database, today: NaiveDate) -> Self {
        Self { db, today }
    }

    /// The reference date this registry computes ages against.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Create a patient, optionally assigning doctors in the same call.
    ///
    /// Unknown doctor IDs reject the whole create, the same policy as
    /// [`Registry::assign_doctors`].
    pub fn create_patient(&self, input: &NewPatient) -> RegistryResult<Patient> {
        self.validate_patient_fields(
            &input.first_name,
            &input.last_name,
            input.birthday,
            input.height,
            input.weight,
        )?;
        self.ensure_doctors_exist(&input.doctor_ids)?;

        let patient = Patient::new(input);
        self.db.insert_patient(&patient)?;
        for doctor_id in &input.doctor_ids {
            self.db.link_doctor(&patient.id, doctor_id)?;
        }

        tracing::info!(patient_id = %patient.id, "patient created");
        Ok(patient)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> RegistryResult<Patient> {
        self.db
            .get_patient(id)?
            .ok_or_else(|| RegistryError::PatientNotFound(id.to_string()))
    }

    /// Apply a partial update to a patient. The merged record is validated
    /// under the same rules as creation.
    pub fn update_patient(&self, id: &str, update: &PatientUpdate) -> RegistryResult<Patient> {
        let mut patient = self.get_patient(id)?;
        update.apply(&mut patient);
        self.validate_patient_fields(
            &patient.first_name,
            &patient.last_name,
            patient.birthday,
            patient.height,
            patient.weight,
        )?;

        patient.touch();
        if !self.db.update_patient(&patient)? {
            return Err(RegistryError::PatientNotFound(id.to_string()));
        }
        Ok(patient)
    }

    /// Delete a patient. Assignment links and BMR history go with it;
    /// linked doctors are untouched.
    pub fn delete_patient(&self, id: &str) -> RegistryResult<()> {
        if !self.db.delete_patient(id)? {
            return Err(RegistryError::PatientNotFound(id.to_string()));
        }
        tracing::info!(patient_id = %id, "patient deleted");
        Ok(())
    }

    // =========================================================================
    // Doctor Operations
    // =========================================================================

    /// Create a doctor.
    pub fn create_doctor(&self, input: &NewDoctor) -> RegistryResult<Doctor> {
        require_name("first_name", &input.first_name)?;
        require_name("last_name", &input.last_name)?;

        let doctor = Doctor::new(input);
        self.db.insert_doctor(&doctor)?;
        tracing::info!(doctor_id = %doctor.id, "doctor created");
        Ok(doctor)
    }

    /// Get a doctor by ID.
    pub fn get_doctor(&self, id: &str) -> RegistryResult<Doctor> {
        self.db
            .get_doctor(id)?
            .ok_or_else(|| RegistryError::DoctorNotFound(id.to_string()))
    }

    /// Apply a partial update to a doctor.
    pub fn update_doctor(&self, id: &str, update: &DoctorUpdate) -> RegistryResult<Doctor> {
        let mut doctor = self.get_doctor(id)?;
        update.apply(&mut doctor);
        require_name("first_name", &doctor.first_name)?;
        require_name("last_name", &doctor.last_name)?;

        doctor.touch();
        if !self.db.update_doctor(&doctor)? {
            return Err(RegistryError::DoctorNotFound(id.to_string()));
        }
        Ok(doctor)
    }

    /// Delete a doctor. Its assignment links cascade; patients stay.
    pub fn delete_doctor(&self, id: &str) -> RegistryResult<()> {
        if !self.db.delete_doctor(id)? {
            return Err(RegistryError::DoctorNotFound(id.to_string()));
        }
        tracing::info!(doctor_id = %id, "doctor deleted");
        Ok(())
    }

    // =========================================================================
    // Assignment Operations
    // =========================================================================

    /// Assign doctors to a patient. The whole batch fails if any ID is
    /// unknown; on success linking is idempotent-additive and existing
    /// links are never removed.
    pub fn assign_doctors(&self, patient_id: &str, doctor_ids: &[String]) -> RegistryResult<Patient> {
        let patient = self.get_patient(patient_id)?;
        self.ensure_doctors_exist(doctor_ids)?;

        for doctor_id in doctor_ids {
            self.db.link_doctor(&patient.id, doctor_id)?;
        }
        tracing::debug!(patient_id = %patient.id, count = doctor_ids.len(), "doctors assigned");
        Ok(patient)
    }

    /// Remove exactly one doctor from a patient.
    pub fn remove_doctor(&self, patient_id: &str, doctor_id: &str) -> RegistryResult<Patient> {
        let patient = self.get_patient(patient_id)?;
        self.get_doctor(doctor_id)?;

        if !self.db.unlink_doctor(patient_id, doctor_id)? {
            return Err(RegistryError::LinkNotFound {
                patient_id: patient_id.to_string(),
                doctor_id: doctor_id.to_string(),
            });
        }
        Ok(patient)
    }

    /// List the doctors assigned to a patient.
    pub fn doctors_of(&self, patient_id: &str) -> RegistryResult<Vec<Doctor>> {
        self.get_patient(patient_id)?;
        Ok(self.db.doctors_of(patient_id)?)
    }

    /// List the patients assigned to a doctor.
    pub fn patients_of(&self, doctor_id: &str) -> RegistryResult<Vec<Patient>> {
        self.get_doctor(doctor_id)?;
        Ok(self.db.patients_of(doctor_id)?)
    }

    // =========================================================================
    // BMR Operations
    // =========================================================================

    /// Compute BMR for a patient from its stored attributes and persist an
    /// immutable history entry. The stored result is unrounded; a failed
    /// parse or computation writes nothing.
    pub fn record_bmr(&self, patient_id: &str, formula: &str) -> RegistryResult<BmrCalculation> {
        let patient = self.get_patient(patient_id)?;
        let formula = BmrFormula::parse(formula)?;

        let age = patient.age_on(self.today);
        let result = formula.compute(patient.gender, patient.weight, patient.height, age);

        let calculation = BmrCalculation::new(patient.id.clone(), formula, result);
        self.db.insert_bmr(&calculation)?;

        tracing::debug!(
            patient_id = %patient.id,
            formula = formula.as_str(),
            result,
            "BMR recorded"
        );
        Ok(calculation)
    }

    // =========================================================================
    // Validation Helpers
    // =========================================================================

    fn validate_patient_fields(
        &self,
        first_name: &str,
        last_name: &str,
        birthday: NaiveDate,
        height: f64,
        weight: f64,
    ) -> RegistryResult<()> {
        require_name("first_name", first_name)?;
        require_name("last_name", last_name)?;
        check_positive("height", height)?;
        check_positive("weight", weight)?;
        if birthday > self.today {
            return Err(RegistryError::FutureBirthday(birthday));
        }
        Ok(())
    }

    fn ensure_doctors_exist(&self, doctor_ids: &[String]) -> RegistryResult<()> {
        if doctor_ids.is_empty() {
            return Ok(());
        }
        let existing = self.db.existing_doctor_ids(doctor_ids)?;
        let mut missing: Vec<String> = doctor_ids
            .iter()
            .filter(|id| !existing.contains(id))
            .cloned()
            .collect();
        missing.dedup();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::UnknownDoctors(missing))
        }
    }
}

fn require_name(field: &'static str, value: &str) -> RegistryResult<()> {
    if value.trim().is_empty() {
        Err(RegistryError::MissingField(field))
    } else {
        Ok(())
    }
}
