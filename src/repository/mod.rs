//! Repository layer for database operations

pub mod categories;
pub mod compilations;
pub mod events;
pub mod hits;
pub mod requests;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub categories: categories::CategoriesRepository,
    pub events: events::EventsRepository,
    pub requests: requests::RequestsRepository,
    pub compilations: compilations::CompilationsRepository,
    pub hits: hits::HitsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            events: events::EventsRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            compilations: compilations::CompilationsRepository::new(pool.clone()),
            hits: hits::HitsRepository::new(pool.clone()),
            pool,
        }
    }
}
