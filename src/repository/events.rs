//! Events repository

use chrono::{NaiveDateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        event::{Event, EventDetailsRow, EventFilter, EventSort, NewEventDto},
        location::Location,
    },
};

/// Shared SELECT joining an event with its category, initiator and location
const SELECT_DETAILS: &str = "SELECT e.id, e.annotation, e.confirmed_requests, e.created_on, \
     e.description, e.event_date, e.paid, e.participant_limit, e.published_on, \
     e.request_moderation, e.state, e.title, e.views, \
     c.id AS category_id, c.name AS category_name, \
     u.id AS initiator_id, u.name AS initiator_name, \
     l.lat, l.lon \
     FROM events e \
     JOIN categories c ON c.id = e.category_id \
     JOIN users u ON u.id = e.initiator_id \
     JOIN locations l ON l.id = e.location_id";

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create an event together with its location, in one transaction
    pub async fn create(
        &self,
        initiator_id: i64,
        new: &NewEventDto,
        created_on: NaiveDateTime,
    ) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;

        let location = sqlx::query_as::<_, Location>(
            "INSERT INTO locations (lat, lon) VALUES ($1, $2) RETURNING *",
        )
        .bind(new.location.lat)
        .bind(new.location.lon)
        .fetch_one(&mut *tx)
        .await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                annotation, category_id, confirmed_requests, created_on, description,
                event_date, initiator_id, location_id, paid, participant_limit,
                request_moderation, state, title, views
            ) VALUES ($1, $2, 0, $3, $4, $5, $6, $7, $8, $9, $10, 'PENDING', $11, 0)
            RETURNING *
            "#,
        )
        .bind(&new.annotation)
        .bind(new.category)
        .bind(created_on)
        .bind(&new.description)
        .bind(new.event_date)
        .bind(initiator_id)
        .bind(location.id)
        .bind(new.paid.unwrap_or(false))
        .bind(new.participant_limit.unwrap_or(0))
        .bind(new.request_moderation.unwrap_or(true))
        .bind(&new.title)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(event)
    }

    /// Persist all mutable fields of an event row
    pub async fn save(&self, event: &Event) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE events SET
                annotation = $1, category_id = $2, confirmed_requests = $3,
                description = $4, event_date = $5, location_id = $6, paid = $7,
                participant_limit = $8, published_on = $9, request_moderation = $10,
                state = $11, title = $12, views = $13
            WHERE id = $14
            "#,
        )
        .bind(&event.annotation)
        .bind(event.category_id)
        .bind(event.confirmed_requests)
        .bind(&event.description)
        .bind(event.event_date)
        .bind(event.location_id)
        .bind(event.paid)
        .bind(event.participant_limit)
        .bind(event.published_on)
        .bind(event.request_moderation)
        .bind(event.state)
        .bind(&event.title)
        .bind(event.views)
        .bind(event.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get the bare event row by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Event> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event with id {} not found", id)))
    }

    /// Get the bare event row by (initiator, id); owner-scoped lookups go
    /// through this so a foreign event reads as missing
    pub async fn get_by_initiator_and_id(&self, initiator_id: i64, id: i64) -> AppResult<Event> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE initiator_id = $1 AND id = $2")
            .bind(initiator_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Event with id {} initiated by user {} not found",
                    id, initiator_id
                ))
            })
    }

    /// Get the joined event representation by ID
    pub async fn details(&self, id: i64) -> AppResult<EventDetailsRow> {
        let query = format!("{} WHERE e.id = $1", SELECT_DETAILS);
        sqlx::query_as::<_, EventDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event with id {} not found", id)))
    }

    /// Get the joined event representation, published events only
    pub async fn details_published(&self, id: i64) -> AppResult<EventDetailsRow> {
        let query = format!("{} WHERE e.id = $1 AND e.state = 'PUBLISHED'", SELECT_DETAILS);
        sqlx::query_as::<_, EventDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Published event with id {} not found", id)))
    }

    /// List an initiator's events ordered by event date
    pub async fn list_by_initiator(
        &self,
        initiator_id: i64,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<EventDetailsRow>> {
        let query = format!(
            "{} WHERE e.initiator_id = $1 ORDER BY e.event_date ASC LIMIT $2 OFFSET $3",
            SELECT_DETAILS
        );
        let rows = sqlx::query_as::<_, EventDetailsRow>(&query)
            .bind(initiator_id)
            .bind(size)
            .bind(from)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Search events with the composed filter, sort and pagination.
    /// When no range start is given the search covers upcoming events only.
    pub async fn search(
        &self,
        filter: &EventFilter,
        sort: EventSort,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<EventDetailsRow>> {
        let range_start = filter
            .range_start
            .unwrap_or_else(|| Utc::now().naive_utc());

        let conditions = where_conditions(filter);
        let order = match sort {
            EventSort::EventDate => "e.event_date ASC",
            EventSort::Views => "e.views DESC",
        };
        let query = format!(
            "{} WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
            SELECT_DETAILS,
            conditions.join(" AND "),
            order,
            size,
            from
        );

        // Binds must line up with the condition order in where_conditions
        let mut builder = sqlx::query_as::<_, EventDetailsRow>(&query);
        if let Some(text) = search_text(filter) {
            let pattern = format!("%{}%", text.to_lowercase());
            builder = builder.bind(pattern.clone()).bind(pattern);
        }
        if let Some(categories) = &filter.categories {
            builder = builder.bind(categories.clone());
        }
        if let Some(paid) = filter.paid {
            builder = builder.bind(paid);
        }
        builder = builder.bind(range_start);
        if let Some(range_end) = filter.range_end {
            builder = builder.bind(range_end);
        }
        if let Some(initiators) = &filter.initiators {
            builder = builder.bind(initiators.clone());
        }
        if let Some(states) = &filter.states {
            let states: Vec<String> = states.iter().map(|s| s.as_str().to_string()).collect();
            builder = builder.bind(states);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Store a fresh location row, used when an admin moves an event
    pub async fn insert_location(&self, lat: f64, lon: f64) -> AppResult<Location> {
        let row = sqlx::query_as::<_, Location>(
            "INSERT INTO locations (lat, lon) VALUES ($1, $2) RETURNING *",
        )
        .bind(lat)
        .bind(lon)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Bump the view counter; every public single-event fetch counts
    pub async fn increment_views(&self, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE events SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn search_text(filter: &EventFilter) -> Option<&str> {
    filter.text.as_deref().filter(|t| !t.trim().is_empty())
}

/// Build WHERE conditions for the event search with running bind indices.
/// Kept separate from the bind phase so the SQL shape is testable.
fn where_conditions(filter: &EventFilter) -> Vec<String> {
    let mut conditions = Vec::new();
    let mut idx = 1;

    if search_text(filter).is_some() {
        conditions.push(format!(
            "(LOWER(e.annotation) LIKE ${} OR LOWER(e.description) LIKE ${})",
            idx,
            idx + 1
        ));
        idx += 2;
    }
    if filter.categories.is_some() {
        conditions.push(format!("e.category_id = ANY(${})", idx));
        idx += 1;
    }
    if filter.paid.is_some() {
        conditions.push(format!("e.paid = ${}", idx));
        idx += 1;
    }
    conditions.push(format!("e.event_date >= ${}", idx));
    idx += 1;
    if filter.range_end.is_some() {
        conditions.push(format!("e.event_date <= ${}", idx));
        idx += 1;
    }
    if filter.only_available {
        conditions.push("e.participant_limit > e.confirmed_requests".to_string());
    }
    if filter.initiators.is_some() {
        conditions.push(format!("e.initiator_id = ANY(${})", idx));
        idx += 1;
    }
    if filter.states.is_some() {
        conditions.push(format!("e.state = ANY(${})", idx));
    }

    conditions
}

#[cfg(test)]
mod tests {
    use crate::models::event::EventState;

    use super::*;

    #[test]
    fn test_where_conditions_default_filter() {
        let conditions = where_conditions(&EventFilter::default());
        assert_eq!(conditions, vec!["e.event_date >= $1".to_string()]);
    }

    #[test]
    fn test_where_conditions_full_filter() {
        let filter = EventFilter {
            text: Some("music".to_string()),
            categories: Some(vec![1, 2]),
            paid: Some(true),
            range_start: None,
            range_end: Some(
                chrono::NaiveDate::from_ymd_opt(2025, 12, 31)
                    .unwrap()
                    .and_hms_opt(23, 59, 59)
                    .unwrap(),
            ),
            only_available: true,
            initiators: Some(vec![5]),
            states: Some(vec![EventState::Published]),
        };

        let conditions = where_conditions(&filter);
        assert_eq!(
            conditions,
            vec![
                "(LOWER(e.annotation) LIKE $1 OR LOWER(e.description) LIKE $2)".to_string(),
                "e.category_id = ANY($3)".to_string(),
                "e.paid = $4".to_string(),
                "e.event_date >= $5".to_string(),
                "e.event_date <= $6".to_string(),
                "e.participant_limit > e.confirmed_requests".to_string(),
                "e.initiator_id = ANY($7)".to_string(),
                "e.state = ANY($8)".to_string(),
            ]
        );
    }

    #[test]
    fn test_blank_text_is_skipped() {
        let filter = EventFilter {
            text: Some("   ".to_string()),
            ..EventFilter::default()
        };
        assert_eq!(where_conditions(&filter), vec!["e.event_date >= $1".to_string()]);
    }
}
