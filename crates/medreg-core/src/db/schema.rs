//! SQLite schema definition.

/// Complete database schema for medreg.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    middle_name TEXT,
    birthday TEXT NOT NULL,                      -- ISO date YYYY-MM-DD
    gender TEXT NOT NULL CHECK (gender IN ('male', 'female')),
    height REAL NOT NULL CHECK (height > 0),     -- centimeters
    weight REAL NOT NULL CHECK (weight > 0),     -- kilograms
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Natural key: no two patients may share name and birthday. COALESCE folds
-- absent middle names into the key; a plain unique index treats NULLs as
-- distinct and would never collide on them.
CREATE UNIQUE INDEX IF NOT EXISTS idx_patients_identity
    ON patients(first_name, last_name, COALESCE(middle_name, ''), birthday);

CREATE INDEX IF NOT EXISTS idx_patients_birthday ON patients(birthday);

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    middle_name TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Doctor/patient assignments
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctor_patients (
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    doctor_id TEXT NOT NULL REFERENCES doctors(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (patient_id, doctor_id)
);

CREATE INDEX IF NOT EXISTS idx_doctor_patients_doctor ON doctor_patients(doctor_id);

-- ============================================================================
-- BMR history (append-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS bmr_calculations (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    formula TEXT NOT NULL,
    result REAL NOT NULL CHECK (result > 0),     -- unrounded kcal/day
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_bmr_patient ON bmr_calculations(patient_id);
"#;
