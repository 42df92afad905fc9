//! BMR history database operations.

use rusqlite::{params, Row};

use super::{Database, DbError, DbResult};
use crate::models::BmrCalculation;
use crate::metrics::BmrFormula;

impl Database {
    /// Insert one BMR history entry. Rows are never updated afterwards.
    pub fn insert_bmr(&self, calculation: &BmrCalculation) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO bmr_calculations (id, patient_id, formula, result, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                calculation.id,
                calculation.patient_id,
                calculation.formula.as_str(),
                calculation.result,
                calculation.created_at,
            ],
        )?;
        Ok(())
    }

    /// List a patient's BMR history, newest first.
    pub fn list_bmr_for_patient(&self, patient_id: &str) -> DbResult<Vec<BmrCalculation>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, formula, result, created_at
            FROM bmr_calculations
            WHERE patient_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], BmrRow::from_row)?;

        let mut calculations = Vec::new();
        for row in rows {
            calculations.push(row?.try_into()?);
        }
        Ok(calculations)
    }
}

/// Intermediate row struct for database mapping.
struct BmrRow {
    id: String,
    patient_id: String,
    formula: String,
    result: f64,
    created_at: String,
}

impl BmrRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            formula: row.get(2)?,
            result: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl TryFrom<BmrRow> for BmrCalculation {
    type Error = DbError;

    fn try_from(row: BmrRow) -> Result<Self, Self::Error> {
        let formula =
            BmrFormula::parse(&row.formula).map_err(|e| DbError::Corrupt(e.to_string()))?;

        Ok(BmrCalculation {
            id: row.id,
            patient_id: row.patient_id,
            formula,
            result: row.result,
            created_at: row.created_at,
        })
    }
}
