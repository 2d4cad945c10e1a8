//! API handlers for the REST endpoints

pub mod categories;
pub mod compilations;
pub mod events;
pub mod health;
pub mod openapi;
pub mod requests;
pub mod stats;
pub mod users;
