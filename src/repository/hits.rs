//! Endpoint hit log repository, used by the stats service

use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::stats::{EndpointHit, ViewStats},
};

#[derive(Clone)]
pub struct HitsRepository {
    pool: Pool<Postgres>,
}

impl HitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append one hit to the log
    pub async fn insert(&self, hit: &EndpointHit) -> AppResult<()> {
        sqlx::query("INSERT INTO hits (app, uri, ip, created) VALUES ($1, $2, $3, $4)")
            .bind(&hit.app)
            .bind(&hit.uri)
            .bind(&hit.ip)
            .bind(hit.timestamp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Aggregate hit counts by (app, uri) over a time window, optionally
    /// restricted to a URI set and optionally counting distinct IPs only
    pub async fn stats(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        uris: Option<&[String]>,
        unique: bool,
    ) -> AppResult<Vec<ViewStats>> {
        let hits_expr = if unique {
            "COUNT(DISTINCT ip)"
        } else {
            "COUNT(ip)"
        };
        let uri_clause = if uris.is_some() { " AND uri = ANY($3)" } else { "" };

        let query = format!(
            "SELECT app, uri, {} AS hits FROM hits \
             WHERE created BETWEEN $1 AND $2{} \
             GROUP BY app, uri ORDER BY hits DESC",
            hits_expr, uri_clause
        );

        let mut builder = sqlx::query_as::<_, ViewStats>(&query).bind(start).bind(end);
        if let Some(uris) = uris {
            builder = builder.bind(uris);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }
}
