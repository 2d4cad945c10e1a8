//! Participation requests repository

use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::request::{Request, RequestStatus},
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a participation request
    pub async fn create(
        &self,
        event_id: i64,
        requester_id: i64,
        created: NaiveDateTime,
        status: RequestStatus,
    ) -> AppResult<Request> {
        let row = sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (created, event_id, requester_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(created)
        .bind(event_id)
        .bind(requester_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Request> {
        sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Check whether a user already requested participation in an event
    pub async fn exists_by_requester_and_event(
        &self,
        requester_id: i64,
        event_id: i64,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM requests WHERE requester_id = $1 AND event_id = $2)",
        )
        .bind(requester_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Count confirmed requests for an event
    pub async fn count_confirmed(&self, event_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM requests WHERE event_id = $1 AND status = 'CONFIRMED'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// List all requests made by a user
    pub async fn list_by_requester(&self, requester_id: i64) -> AppResult<Vec<Request>> {
        let rows = sqlx::query_as::<_, Request>(
            "SELECT * FROM requests WHERE requester_id = $1 ORDER BY id",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// List all requests targeting an event
    pub async fn list_by_event(&self, event_id: i64) -> AppResult<Vec<Request>> {
        let rows =
            sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE event_id = $1 ORDER BY id")
                .bind(event_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    /// List the still-pending requests for an event
    pub async fn list_pending_by_event(&self, event_id: i64) -> AppResult<Vec<Request>> {
        let rows = sqlx::query_as::<_, Request>(
            "SELECT * FROM requests WHERE event_id = $1 AND status = 'PENDING' ORDER BY id",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetch requests by id set, returned in the order of the given list
    pub async fn list_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Request>> {
        let mut rows =
            sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        rows.sort_by_key(|r| ids.iter().position(|id| *id == r.id));
        Ok(rows)
    }

    /// Update the status of one request
    pub async fn set_status(&self, id: i64, status: RequestStatus) -> AppResult<Request> {
        sqlx::query_as::<_, Request>(
            "UPDATE requests SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Apply a batch decision atomically: either every confirmation and
    /// rejection lands, or none of them do.
    pub async fn apply_status_updates(
        &self,
        confirmed_ids: &[i64],
        rejected_ids: &[i64],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        if !confirmed_ids.is_empty() {
            sqlx::query("UPDATE requests SET status = 'CONFIRMED' WHERE id = ANY($1)")
                .bind(confirmed_ids)
                .execute(&mut *tx)
                .await?;
        }
        if !rejected_ids.is_empty() {
            sqlx::query("UPDATE requests SET status = 'REJECTED' WHERE id = ANY($1)")
                .bind(rejected_ids)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
