//! Database models for rate observations.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use ratekeeper_core::rates::{NewObservation, Observation};

/// Columns bound per inserted row.
pub const OBSERVATION_INSERT_COLUMNS: usize = 3;

/// Database model for a stored observation
#[derive(Queryable, Selectable, QueryableByName, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::observations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ObservationDB {
    pub id: i64,
    pub code: String,
    pub rate_to_reference: f64,
    pub captured_at: NaiveDateTime,
}

/// Database model for a row to insert; `id` is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::observations)]
pub struct NewObservationDB {
    pub code: String,
    pub rate_to_reference: f64,
    pub captured_at: NaiveDateTime,
}

impl From<ObservationDB> for Observation {
    fn from(db: ObservationDB) -> Self {
        Self {
            id: db.id,
            code: db.code,
            rate_to_reference: db.rate_to_reference,
            captured_at: DateTime::from_naive_utc_and_offset(db.captured_at, Utc),
        }
    }
}

impl From<NewObservation> for NewObservationDB {
    fn from(domain: NewObservation) -> Self {
        Self {
            code: domain.code,
            rate_to_reference: domain.rate_to_reference,
            captured_at: domain.captured_at.naive_utc(),
        }
    }
}
