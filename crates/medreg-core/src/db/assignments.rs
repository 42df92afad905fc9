//! Doctor/patient assignment operations.

use rusqlite::params;

use super::doctors::doctor_from_row;
use super::{Database, DbResult, PatientRow};
use crate::models::{Doctor, Patient};

impl Database {
    /// Link a doctor to a patient. Idempotent: re-linking an existing pair
    /// is a no-op. Returns whether a new link was created.
    pub fn link_doctor(&self, patient_id: &str, doctor_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "INSERT OR IGNORE INTO doctor_patients (patient_id, doctor_id) VALUES (?1, ?2)",
            params![patient_id, doctor_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Remove one doctor/patient link. Returns whether the link existed.
    pub fn unlink_doctor(&self, patient_id: &str, doctor_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM doctor_patients WHERE patient_id = ?1 AND doctor_id = ?2",
            params![patient_id, doctor_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// List the doctors assigned to a patient, in assignment order.
    pub fn doctors_of(&self, patient_id: &str) -> DbResult<Vec<Doctor>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT d.id, d.first_name, d.last_name, d.middle_name, d.created_at, d.updated_at
            FROM doctors d
            JOIN doctor_patients dp ON dp.doctor_id = d.id
            WHERE dp.patient_id = ?
            ORDER BY dp.rowid
            "#,
        )?;

        let rows = stmt.query_map([patient_id], doctor_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List the patients assigned to a doctor, in assignment order.
    pub fn patients_of(&self, doctor_id: &str) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.id, p.first_name, p.last_name, p.middle_name, p.birthday,
                   p.gender, p.height, p.weight, p.created_at, p.updated_at
            FROM patients p
            JOIN doctor_patients dp ON dp.patient_id = p.id
            WHERE dp.doctor_id = ?
            ORDER BY dp.rowid
            "#,
        )?;

        let rows = stmt.query_map([doctor_id], PatientRow::from_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// Which of the given doctor IDs exist. Used to reject assignment
    /// batches carrying unknown identifiers before any link is written.
    pub fn existing_doctor_ids(&self, ids: &[String]) -> DbResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT id FROM doctors WHERE id IN ({placeholders})");
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt.query_map(rusqlite::params_from_iter(ids), |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
