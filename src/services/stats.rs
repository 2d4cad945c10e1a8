//! Hit log and view statistics service

use crate::{
    error::{AppError, AppResult},
    models::stats::{EndpointHit, StatsQuery, ViewStats},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record one endpoint hit and echo it back
    pub async fn record_hit(&self, hit: &EndpointHit) -> AppResult<EndpointHit> {
        self.repository.hits.insert(hit).await?;
        Ok(hit.clone())
    }

    /// Aggregate view counts over a time window
    pub async fn get_stats(&self, query: &StatsQuery) -> AppResult<Vec<ViewStats>> {
        if query.start > query.end {
            tracing::warn!("Stats window start {} is after end {}", query.start, query.end);
            return Err(AppError::Validation(
                "start must not be after end".to_string(),
            ));
        }
        self.repository
            .hits
            .stats(query.start, query.end, query.uris.as_deref(), query.unique)
            .await
    }
}
