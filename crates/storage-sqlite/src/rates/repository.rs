use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Timestamp;
use log::debug;

use ratekeeper_core::rates::{NewObservation, Observation, ObservationRepositoryTrait, TimeRange};
use ratekeeper_core::Result;

use super::model::{NewObservationDB, ObservationDB, OBSERVATION_INSERT_COLUMNS};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::observations;
use crate::utils::chunk_for_insert;

const LATEST_PER_CODE: &str = "
    SELECT id, code, rate_to_reference, captured_at
    FROM (
        SELECT id, code, rate_to_reference, captured_at,
               ROW_NUMBER() OVER (
                   PARTITION BY code ORDER BY captured_at DESC, id DESC
               ) AS rn
        FROM observations
        {filter}
    )
    WHERE rn = 1
    ORDER BY code";

/// Append-only observation log on SQLite.
///
/// Reads go through the pool; every write goes through the single writer.
#[derive(Clone)]
pub struct ObservationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ObservationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ObservationRepositoryTrait for ObservationRepository {
    async fn insert_batch(&self, batch: Vec<NewObservation>) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let rows: Vec<NewObservationDB> = batch.into_iter().map(NewObservationDB::from).collect();
        self.writer
            .exec(move |conn| {
                let mut inserted = 0;
                for chunk in chunk_for_insert(&rows, OBSERVATION_INSERT_COLUMNS) {
                    inserted += diesel::insert_into(observations::table)
                        .values(chunk)
                        .execute(conn)
                        .into_core()?;
                }
                debug!("Inserted {} observations", inserted);
                Ok(inserted)
            })
            .await
    }

    fn get_history(&self, code: &str, range: &TimeRange) -> Result<Vec<Observation>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = observations::table
            .select(ObservationDB::as_select())
            .filter(observations::code.eq(code))
            .into_boxed();
        if let Some(from) = range.from {
            query = query.filter(observations::captured_at.ge(from.naive_utc()));
        }
        if let Some(to) = range.to {
            query = query.filter(observations::captured_at.le(to.naive_utc()));
        }

        let rows = query
            .order((observations::captured_at.asc(), observations::id.asc()))
            .load::<ObservationDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Observation::from).collect())
    }

    fn get_latest(
        &self,
        code: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Option<Observation>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = observations::table
            .select(ObservationDB::as_select())
            .filter(observations::code.eq(code))
            .into_boxed();
        if let Some(as_of) = as_of {
            query = query.filter(observations::captured_at.le(as_of.naive_utc()));
        }

        let row = query
            .order((observations::captured_at.desc(), observations::id.desc()))
            .first::<ObservationDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Observation::from))
    }

    fn get_latest_snapshot(&self, as_of: Option<DateTime<Utc>>) -> Result<Vec<Observation>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<ObservationDB> = match as_of {
            Some(as_of) => diesel::sql_query(
                LATEST_PER_CODE.replace("{filter}", "WHERE captured_at <= ?"),
            )
            .bind::<Timestamp, _>(as_of.naive_utc())
            .load(&mut conn)
            .into_core()?,
            None => diesel::sql_query(LATEST_PER_CODE.replace("{filter}", ""))
                .load(&mut conn)
                .into_core()?,
        };

        Ok(rows.into_iter().map(Observation::from).collect())
    }
}
