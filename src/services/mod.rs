//! Business logic services

pub mod categories;
pub mod compilations;
pub mod events;
pub mod requests;
pub mod stats;
pub mod stats_client;
pub mod users;

use crate::{config::StatsConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub categories: categories::CategoriesService,
    pub events: events::EventsService,
    pub requests: requests::RequestsService,
    pub compilations: compilations::CompilationsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, stats_config: &StatsConfig) -> Self {
        let stats_client = stats_client::StatsClient::new(&stats_config.url);
        Self {
            users: users::UsersService::new(repository.clone()),
            categories: categories::CategoriesService::new(repository.clone()),
            events: events::EventsService::new(repository.clone(), stats_client),
            requests: requests::RequestsService::new(repository.clone()),
            compilations: compilations::CompilationsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}

/// Resolve from/size paging parameters with the API defaults
pub(crate) fn page_params(from: Option<i64>, size: Option<i64>) -> (i64, i64) {
    (from.unwrap_or(0).max(0), size.unwrap_or(10).max(1))
}

#[cfg(test)]
mod tests {
    use super::page_params;

    #[test]
    fn test_page_params_defaults() {
        assert_eq!(page_params(None, None), (0, 10));
        assert_eq!(page_params(Some(20), Some(5)), (20, 5));
        assert_eq!(page_params(Some(-1), Some(0)), (0, 1));
    }
}
