//! City repository
//!
//! Rows are rendered to JSON by PostgreSQL itself (`row_to_json`) so the
//! column set and value encoding follow the table schema exactly. The
//! service forwards each object untouched.

use serde::Serialize;
use serde_json::value::RawValue;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::{acquire, DbError};

/// Select every row of the cities table, one JSON object per row.
const LIST_CITIES_SQL: &str = "SELECT row_to_json(c) AS city FROM cities AS c";

/// One row of the cities table as a JSON object keyed by column name
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CityRecord(Box<RawValue>);

impl CityRecord {
    /// Raw JSON text of the row
    pub fn as_json(&self) -> &str {
        self.0.get()
    }
}

/// City repository
pub struct CityRepo<'a> {
    pool: &'a PgPool,
    sql: &'static str,
}

impl<'a> CityRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            sql: LIST_CITIES_SQL,
        }
    }

    #[cfg(test)]
    fn with_query(pool: &'a PgPool, sql: &'static str) -> Self {
        Self { pool, sql }
    }

    /// List all cities in table order.
    ///
    /// Holds one explicit checkout for the duration of the query. The guard
    /// is dropped at the end of this scope, so the connection returns to the
    /// pool whether the query succeeds or fails.
    pub async fn list(&self) -> Result<Vec<CityRecord>, DbError> {
        let mut conn = acquire(self.pool).await?;

        let rows: Vec<Json<Box<RawValue>>> = sqlx::query_scalar(self.sql)
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(|Json(raw)| CityRecord(raw)).collect())
    }
}
