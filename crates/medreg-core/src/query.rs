//! Filtered, paginated read views.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::models::{BmrCalculation, Doctor, Gender, Patient};
use crate::registry::{RegistryError, RegistryResult};
use crate::search::NameQuery;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Conjunctive patient list filters. Every present filter must hold.
#[derive(Debug, Clone, Default)]
pub struct PatientFilter {
    /// Free-text name query, tokenized per [`NameQuery`]
    pub full_name: Option<String>,
    /// Youngest admissible age, inclusive
    pub start_age: Option<i32>,
    /// Oldest admissible age, inclusive
    pub end_age: Option<i32>,
    pub gender: Option<Gender>,
}

/// Offset-based page request. Page numbers start at 1.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Build a page request. Degenerate values are clamped rather than
    /// rejected: page to 1, per_page to 1. Parameter parsing belongs to
    /// the transport layer.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total_entries: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Slice a full result set into the requested page.
    fn paginate(all: Vec<T>, request: PageRequest) -> Self {
        let total_entries = all.len() as u64;
        let per_page = u64::from(request.per_page);
        let offset = u64::from(request.page - 1) * per_page;

        let items = all
            .into_iter()
            .skip(offset as usize)
            .take(per_page as usize)
            .collect();

        Self {
            items,
            current_page: request.page,
            per_page: request.per_page,
            total_entries,
            total_pages: total_entries.div_ceil(per_page),
        }
    }
}

/// Read-only query surface over the registry.
pub struct QueryEngine<'a> {
    db: &'a Database,
    today: NaiveDate,
}

impl<'a> QueryEngine<'a> {
    /// Create a query engine using today's UTC date as the reference date.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            today: Utc::now().date_naive(),
        }
    }

    /// Pin the reference date used for the age-window conversion.
    pub fn with_today(db: &'a Database, today: NaiveDate) -> Self {
        Self { db, today }
    }

    /// List patients matching the filter, in stable insertion order.
    ///
    /// The age window converts to inclusive birthday bounds: `start_age`
    /// sets the latest admissible birthday, `end_age` the earliest. The
    /// birthday and gender filters run in SQL; the name query is applied
    /// here.
    pub fn list_patients(
        &self,
        filter: &PatientFilter,
        page: PageRequest,
    ) -> RegistryResult<Page<Patient>> {
        let birthday_max = filter.start_age.map(|age| years_before(self.today, age));
        let birthday_min = filter.end_age.map(|age| years_before(self.today, age));

        let candidates = self
            .db
            .list_patients_filtered(birthday_min, birthday_max, filter.gender)?;

        let query = filter.full_name.as_deref().map(NameQuery::parse);
        let matched: Vec<Patient> = match query {
            Some(ref q) if !q.is_empty() => candidates
                .into_iter()
                .filter(|p| q.matches(&p.first_name, &p.last_name, p.middle_name.as_deref()))
                .collect(),
            _ => candidates,
        };

        tracing::debug!(total = matched.len(), "patient query evaluated");
        Ok(Page::paginate(matched, page))
    }

    /// List all doctors, in stable insertion order.
    pub fn list_doctors(&self, page: PageRequest) -> RegistryResult<Page<Doctor>> {
        Ok(Page::paginate(self.db.list_doctors()?, page))
    }

    /// A patient's BMR history, newest first.
    pub fn bmr_history(
        &self,
        patient_id: &str,
        page: PageRequest,
    ) -> RegistryResult<Page<BmrCalculation>> {
        if self.db.get_patient(patient_id)?.is_none() {
            return Err(RegistryError::PatientNotFound(patient_id.to_string()));
        }
        Ok(Page::paginate(self.db.list_bmr_for_patient(patient_id)?, page))
    }
}

/// The date `years` whole years before `date`. A Feb 29 anchor falls back
/// to Feb 28 when the target year is not a leap year.
fn years_before(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year().saturating_sub(years);
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewPatient, PatientUpdate};
    use crate::registry::Registry;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    const TODAY: &str = "2024-06-01";

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn engine(db: &Database) -> QueryEngine<'_> {
        QueryEngine::with_today(db, date(TODAY))
    }

    fn add_patient(db: &Database, first: &str, last: &str, birthday: &str, gender: Gender) -> Patient {
        Registry::with_today(db, date(TODAY))
            .create_patient(&NewPatient {
                first_name: first.into(),
                last_name: last.into(),
                middle_name: None,
                birthday: date(birthday),
                gender,
                height: 175.0,
                weight: 70.0,
                doctor_ids: vec![],
            })
            .unwrap()
    }

    #[test]
    fn test_unfiltered_list_keeps_insertion_order() {
        let db = setup_db();
        let first = add_patient(&db, "Ivan", "Ivanov", "1990-05-14", Gender::Male);
        let second = add_patient(&db, "Anna", "Sidorova", "1985-01-02", Gender::Female);

        let page = engine(&db)
            .list_patients(&PatientFilter::default(), PageRequest::default())
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, first.id);
        assert_eq!(page.items[1].id, second.id);
        assert_eq!(page.total_entries, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_age_window_is_inclusive() {
        let db = setup_db();
        // Ages on 2024-06-01: 34, 30, 24.
        add_patient(&db, "Ivan", "Ivanov", "1990-05-14", Gender::Male);
        let thirty = add_patient(&db, "Petr", "Petrov", "1994-06-01", Gender::Male);
        add_patient(&db, "Anna", "Sidorova", "1999-12-31", Gender::Female);

        let filter = PatientFilter {
            start_age: Some(30),
            end_age: Some(30),
            ..Default::default()
        };
        let page = engine(&db).list_patients(&filter, PageRequest::default()).unwrap();

        // start_age=30 caps birthdays at 1994-06-01, end_age=30 floors them
        // at the same date; only the patient born exactly 30 years ago fits.
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, thirty.id);
    }

    #[test]
    fn test_age_window_half_open_ends() {
        let db = setup_db();
        let older = add_patient(&db, "Ivan", "Ivanov", "1960-01-01", Gender::Male);
        let younger = add_patient(&db, "Anna", "Sidorova", "2004-01-01", Gender::Female);

        // Only a lower age bound: 30 and up.
        let filter = PatientFilter {
            start_age: Some(30),
            ..Default::default()
        };
        let page = engine(&db).list_patients(&filter, PageRequest::default()).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, older.id);

        // Only an upper age bound: 30 and under.
        let filter = PatientFilter {
            end_age: Some(30),
            ..Default::default()
        };
        let page = engine(&db).list_patients(&filter, PageRequest::default()).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, younger.id);
    }

    #[test]
    fn test_filters_compose_conjunctively() {
        let db = setup_db();
        add_patient(&db, "Ivan", "Ivanov", "1990-05-14", Gender::Male);
        let match_all = add_patient(&db, "Ivanna", "Ivanova", "1992-03-08", Gender::Female);
        add_patient(&db, "Anna", "Sidorova", "1992-07-20", Gender::Female);

        let filter = PatientFilter {
            full_name: Some("иванова".into()),
            start_age: Some(25),
            end_age: Some(40),
            gender: Some(Gender::Female),
        };
        let page = engine(&db).list_patients(&filter, PageRequest::default()).unwrap();
        assert_eq!(page.items.len(), 0); // Cyrillic query, Latin names

        let filter = PatientFilter {
            full_name: Some("ivanova".into()),
            start_age: Some(25),
            end_age: Some(40),
            gender: Some(Gender::Female),
        };
        let page = engine(&db).list_patients(&filter, PageRequest::default()).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, match_all.id);
    }

    #[test]
    fn test_name_query_spans_fields() {
        let db = setup_db();
        let ivan = add_patient(&db, "Иван", "Иванов", "1990-05-14", Gender::Male);
        add_patient(&db, "Пётр", "Петров", "1990-06-14", Gender::Male);

        let filter = PatientFilter {
            full_name: Some("иван ив".into()),
            ..Default::default()
        };
        let page = engine(&db).list_patients(&filter, PageRequest::default()).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, ivan.id);
    }

    #[test]
    fn test_blank_name_query_filters_nothing() {
        let db = setup_db();
        add_patient(&db, "Ivan", "Ivanov", "1990-05-14", Gender::Male);

        let filter = PatientFilter {
            full_name: Some("   ".into()),
            ..Default::default()
        };
        let page = engine(&db).list_patients(&filter, PageRequest::default()).unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_pagination_metadata() {
        let db = setup_db();
        for i in 0..5 {
            add_patient(&db, &format!("P{i}"), "Pat", &format!("199{i}-01-01"), Gender::Male);
        }

        let engine = engine(&db);
        let page = engine
            .list_patients(&PatientFilter::default(), PageRequest::new(2, 2))
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.per_page, 2);
        assert_eq!(page.total_entries, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].first_name, "P2");

        // The last page is short, pages beyond it are empty.
        let last = engine
            .list_patients(&PatientFilter::default(), PageRequest::new(3, 2))
            .unwrap();
        assert_eq!(last.items.len(), 1);

        let beyond = engine
            .list_patients(&PatientFilter::default(), PageRequest::new(9, 2))
            .unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_entries, 5);
    }

    #[test]
    fn test_page_request_clamps_degenerate_values() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 1);
        assert_eq!(PageRequest::default().per_page(), DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_list_doctors_paginated() {
        let db = setup_db();
        let registry = Registry::with_today(&db, date(TODAY));
        for (first, last) in [("Anna", "Petrova"), ("Boris", "Volkov"), ("Vera", "Orlova")] {
            registry
                .create_doctor(&crate::models::NewDoctor {
                    first_name: first.into(),
                    last_name: last.into(),
                    middle_name: None,
                })
                .unwrap();
        }

        let page = engine(&db).list_doctors(PageRequest::new(1, 2)).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_entries, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].first_name, "Anna");
    }

    #[test]
    fn test_bmr_history_pagination_and_not_found() {
        let db = setup_db();
        let registry = Registry::with_today(&db, date(TODAY));
        let patient = add_patient(&db, "Ivan", "Ivanov", "1990-05-14", Gender::Male);
        for _ in 0..3 {
            registry.record_bmr(&patient.id, "mifflin_st_jeor").unwrap();
        }

        let engine = engine(&db);
        let page = engine.bmr_history(&patient.id, PageRequest::new(1, 2)).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_entries, 3);
        assert_eq!(page.total_pages, 2);

        assert!(matches!(
            engine.bmr_history("missing", PageRequest::default()),
            Err(RegistryError::PatientNotFound(_))
        ));
    }

    #[test]
    fn test_age_filter_sees_updated_birthday() {
        let db = setup_db();
        let registry = Registry::with_today(&db, date(TODAY));
        let patient = add_patient(&db, "Ivan", "Ivanov", "1990-05-14", Gender::Male);

        registry
            .update_patient(
                &patient.id,
                &PatientUpdate {
                    birthday: Some(date("2010-05-14")),
                    ..Default::default()
                },
            )
            .unwrap();

        let filter = PatientFilter {
            start_age: Some(30),
            ..Default::default()
        };
        let page = engine(&db).list_patients(&filter, PageRequest::default()).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_years_before_leap_day_anchor() {
        assert_eq!(years_before(date("2024-02-29"), 1), date("2023-02-28"));
        assert_eq!(years_before(date("2024-02-29"), 4), date("2020-02-29"));
        assert_eq!(years_before(date("2024-06-01"), 30), date("1994-06-01"));
    }
}
