//! Patient database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Gender, Patient};

impl Database {
    /// Insert a new patient.
    ///
    /// The natural-key unique index is the authority on duplicates:
    /// check-then-insert races collapse into [`DbError::Duplicate`] here.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO patients (
                    id, first_name, last_name, middle_name, birthday,
                    gender, height, weight, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    patient.id,
                    patient.first_name,
                    patient.last_name,
                    patient.middle_name,
                    patient.birthday.to_string(),
                    patient.gender.as_str(),
                    patient.height,
                    patient.weight,
                    patient.created_at,
                    patient.updated_at,
                ],
            )
            .map_err(map_unique_violation)?;
        Ok(())
    }

    /// Update an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE patients SET
                    first_name = ?2,
                    last_name = ?3,
                    middle_name = ?4,
                    birthday = ?5,
                    gender = ?6,
                    height = ?7,
                    weight = ?8,
                    updated_at = ?9
                WHERE id = ?1
                "#,
                params![
                    patient.id,
                    patient.first_name,
                    patient.last_name,
                    patient.middle_name,
                    patient.birthday.to_string(),
                    patient.gender.as_str(),
                    patient.height,
                    patient.weight,
                    patient.updated_at,
                ],
            )
            .map_err(map_unique_violation)?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                r#"
                SELECT id, first_name, last_name, middle_name, birthday,
                       gender, height, weight, created_at, updated_at
                FROM patients
                WHERE id = ?
                "#,
                [id],
                PatientRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List patients in stable insertion order, with optional birthday
    /// bounds (inclusive, ISO dates compare lexicographically) and gender.
    pub fn list_patients_filtered(
        &self,
        birthday_min: Option<NaiveDate>,
        birthday_max: Option<NaiveDate>,
        gender: Option<Gender>,
    ) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, first_name, last_name, middle_name, birthday,
                   gender, height, weight, created_at, updated_at
            FROM patients
            WHERE (?1 IS NULL OR birthday >= ?1)
              AND (?2 IS NULL OR birthday <= ?2)
              AND (?3 IS NULL OR gender = ?3)
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                birthday_min.map(|d| d.to_string()),
                birthday_max.map(|d| d.to_string()),
                gender.map(|g| g.as_str()),
            ],
            PatientRow::from_row,
        )?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// Delete a patient. Assignment links and BMR history cascade.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
pub(crate) struct PatientRow {
    id: String,
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    birthday: String,
    gender: String,
    height: f64,
    weight: f64,
    created_at: String,
    updated_at: String,
}

impl PatientRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            middle_name: row.get(3)?,
            birthday: row.get(4)?,
            gender: row.get(5)?,
            height: row.get(6)?,
            weight: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let birthday = row
            .birthday
            .parse::<NaiveDate>()
            .map_err(|e| DbError::Corrupt(format!("bad birthday {:?}: {}", row.birthday, e)))?;
        let gender = row
            .gender
            .parse::<Gender>()
            .map_err(|e| DbError::Corrupt(e.to_string()))?;

        Ok(Patient {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            middle_name: row.middle_name,
            birthday,
            gender,
            height: row.height,
            weight: row.weight,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_unique_violation(e: rusqlite::Error) -> DbError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DbError::Duplicate("patient with the same name and birthday")
        }
        _ => DbError::Sqlite(e),
    }
}
