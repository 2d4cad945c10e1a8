//! Compilations repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{compilation::Compilation, event::EventDetailsRow},
};

#[derive(Clone)]
pub struct CompilationsRepository {
    pool: Pool<Postgres>,
}

impl CompilationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a compilation and attach the referenced events, in one transaction
    pub async fn create(
        &self,
        title: &str,
        pinned: bool,
        event_ids: &[i64],
    ) -> AppResult<Compilation> {
        let mut tx = self.pool.begin().await?;

        let compilation = sqlx::query_as::<_, Compilation>(
            "INSERT INTO compilations (pinned, title) VALUES ($1, $2) RETURNING *",
        )
        .bind(pinned)
        .bind(title)
        .fetch_one(&mut *tx)
        .await?;

        if !event_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO compilation_events (compilation_id, event_id)
                SELECT $1, id FROM events WHERE id = ANY($2)
                "#,
            )
            .bind(compilation.id)
            .bind(event_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(compilation)
    }

    /// Get compilation by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Compilation> {
        sqlx::query_as::<_, Compilation>("SELECT * FROM compilations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Compilation with id {} not found", id)))
    }

    /// List compilations, optionally only pinned or unpinned ones
    pub async fn list(
        &self,
        pinned: Option<bool>,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<Compilation>> {
        let rows = match pinned {
            Some(pinned) => {
                sqlx::query_as::<_, Compilation>(
                    "SELECT * FROM compilations WHERE pinned = $1 ORDER BY id LIMIT $2 OFFSET $3",
                )
                .bind(pinned)
                .bind(size)
                .bind(from)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Compilation>(
                    "SELECT * FROM compilations ORDER BY id LIMIT $1 OFFSET $2",
                )
                .bind(size)
                .bind(from)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Update title/pinned fields
    pub async fn save(&self, compilation: &Compilation) -> AppResult<()> {
        sqlx::query("UPDATE compilations SET pinned = $1, title = $2 WHERE id = $3")
            .bind(compilation.pinned)
            .bind(&compilation.title)
            .bind(compilation.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Replace the set of events referenced by a compilation
    pub async fn replace_events(&self, compilation_id: i64, event_ids: &[i64]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM compilation_events WHERE compilation_id = $1")
            .bind(compilation_id)
            .execute(&mut *tx)
            .await?;

        if !event_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO compilation_events (compilation_id, event_id)
                SELECT $1, id FROM events WHERE id = ANY($2)
                "#,
            )
            .bind(compilation_id)
            .bind(event_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a compilation; join rows go with it via ON DELETE CASCADE
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM compilations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Compilation with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Joined event rows referenced by a compilation
    pub async fn event_details(&self, compilation_id: i64) -> AppResult<Vec<EventDetailsRow>> {
        let rows = sqlx::query_as::<_, EventDetailsRow>(
            r#"
            SELECT e.id, e.annotation, e.confirmed_requests, e.created_on,
                   e.description, e.event_date, e.paid, e.participant_limit, e.published_on,
                   e.request_moderation, e.state, e.title, e.views,
                   c.id AS category_id, c.name AS category_name,
                   u.id AS initiator_id, u.name AS initiator_name,
                   l.lat, l.lon
            FROM compilation_events ce
            JOIN events e ON e.id = ce.event_id
            JOIN categories c ON c.id = e.category_id
            JOIN users u ON u.id = e.initiator_id
            JOIN locations l ON l.id = e.location_id
            WHERE ce.compilation_id = $1
            ORDER BY e.id
            "#,
        )
        .bind(compilation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
