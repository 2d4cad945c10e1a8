//! Event model, DTOs and query types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    category::Category,
    location::LocationDto,
    user::UserShortDto,
};

/// Event moderation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventState {
    Pending,
    Published,
    Canceled,
}

impl EventState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Pending => "PENDING",
            EventState::Published => "PUBLISHED",
            EventState::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(EventState::Pending),
            "PUBLISHED" => Ok(EventState::Published),
            "CANCELED" => Ok(EventState::Canceled),
            _ => Err(format!("Invalid event state: {}", s)),
        }
    }
}

// Stored as VARCHAR, same as the rest of the schema
impl sqlx::Type<Postgres> for EventState {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for EventState {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for EventState {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// State action an event owner may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStateAction {
    SendToReview,
    CancelReview,
}

/// State action an admin may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminStateAction {
    PublishEvent,
    RejectEvent,
}

/// Event row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: i64,
    pub annotation: String,
    pub category_id: i64,
    pub confirmed_requests: i64,
    pub created_on: NaiveDateTime,
    pub description: String,
    pub event_date: NaiveDateTime,
    pub initiator_id: i64,
    pub location_id: i64,
    pub paid: bool,
    pub participant_limit: i32,
    pub published_on: Option<NaiveDateTime>,
    pub request_moderation: bool,
    pub state: EventState,
    pub title: String,
    pub views: i64,
}

/// Event row joined with its category, initiator and location
#[derive(Debug, Clone, FromRow)]
pub struct EventDetailsRow {
    pub id: i64,
    pub annotation: String,
    pub confirmed_requests: i64,
    pub created_on: NaiveDateTime,
    pub description: String,
    pub event_date: NaiveDateTime,
    pub paid: bool,
    pub participant_limit: i32,
    pub published_on: Option<NaiveDateTime>,
    pub request_moderation: bool,
    pub state: EventState,
    pub title: String,
    pub views: i64,
    pub category_id: i64,
    pub category_name: String,
    pub initiator_id: i64,
    pub initiator_name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Full event representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventFullDto {
    pub id: i64,
    pub annotation: String,
    pub category: Category,
    pub confirmed_requests: i64,
    #[serde(with = "super::date_time")]
    pub created_on: NaiveDateTime,
    pub description: String,
    #[serde(with = "super::date_time")]
    pub event_date: NaiveDateTime,
    pub initiator: UserShortDto,
    pub location: LocationDto,
    pub paid: bool,
    pub participant_limit: i32,
    #[serde(with = "super::date_time_opt")]
    pub published_on: Option<NaiveDateTime>,
    pub request_moderation: bool,
    pub state: EventState,
    pub title: String,
    pub views: i64,
}

/// Short event representation for listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventShortDto {
    pub id: i64,
    pub annotation: String,
    pub category: Category,
    pub confirmed_requests: i64,
    #[serde(with = "super::date_time")]
    pub event_date: NaiveDateTime,
    pub initiator: UserShortDto,
    pub paid: bool,
    pub title: String,
    pub views: i64,
}

impl From<EventDetailsRow> for EventFullDto {
    fn from(row: EventDetailsRow) -> Self {
        EventFullDto {
            id: row.id,
            annotation: row.annotation,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            confirmed_requests: row.confirmed_requests,
            created_on: row.created_on,
            description: row.description,
            event_date: row.event_date,
            initiator: UserShortDto {
                id: row.initiator_id,
                name: row.initiator_name,
            },
            location: LocationDto {
                lat: row.lat,
                lon: row.lon,
            },
            paid: row.paid,
            participant_limit: row.participant_limit,
            published_on: row.published_on,
            request_moderation: row.request_moderation,
            state: row.state,
            title: row.title,
            views: row.views,
        }
    }
}

impl From<EventDetailsRow> for EventShortDto {
    fn from(row: EventDetailsRow) -> Self {
        EventShortDto {
            id: row.id,
            annotation: row.annotation,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            confirmed_requests: row.confirmed_requests,
            event_date: row.event_date,
            initiator: UserShortDto {
                id: row.initiator_id,
                name: row.initiator_name,
            },
            paid: row.paid,
            title: row.title,
            views: row.views,
        }
    }
}

/// Create event request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEventDto {
    #[validate(length(min = 20, max = 2000, message = "Annotation must be 20-2000 characters"))]
    pub annotation: String,
    pub category: i64,
    #[validate(length(min = 20, max = 7000, message = "Description must be 20-7000 characters"))]
    pub description: String,
    #[serde(with = "super::date_time")]
    pub event_date: NaiveDateTime,
    #[validate(nested)]
    pub location: LocationDto,
    pub paid: Option<bool>,
    #[validate(range(min = 0, message = "Participant limit must not be negative"))]
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
    #[validate(length(min = 3, max = 120, message = "Title must be 3-120 characters"))]
    pub title: String,
}

/// Owner event update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventUserRequest {
    #[validate(length(min = 20, max = 2000, message = "Annotation must be 20-2000 characters"))]
    pub annotation: Option<String>,
    pub category: Option<i64>,
    #[validate(length(min = 20, max = 7000, message = "Description must be 20-7000 characters"))]
    pub description: Option<String>,
    #[serde(default, with = "super::date_time_opt")]
    pub event_date: Option<NaiveDateTime>,
    pub paid: Option<bool>,
    #[validate(range(min = 0, message = "Participant limit must not be negative"))]
    pub participant_limit: Option<i32>,
    pub state_action: Option<UserStateAction>,
    #[validate(length(min = 3, max = 120, message = "Title must be 3-120 characters"))]
    pub title: Option<String>,
}

/// Admin event update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventAdminRequest {
    #[validate(length(min = 20, max = 2000, message = "Annotation must be 20-2000 characters"))]
    pub annotation: Option<String>,
    pub category: Option<i64>,
    #[validate(length(min = 20, max = 7000, message = "Description must be 20-7000 characters"))]
    pub description: Option<String>,
    #[serde(default, with = "super::date_time_opt")]
    pub event_date: Option<NaiveDateTime>,
    #[validate(nested)]
    pub location: Option<LocationDto>,
    pub paid: Option<bool>,
    #[validate(range(min = 0, message = "Participant limit must not be negative"))]
    pub participant_limit: Option<i32>,
    pub request_moderation: Option<bool>,
    pub state_action: Option<AdminStateAction>,
    #[validate(length(min = 3, max = 120, message = "Title must be 3-120 characters"))]
    pub title: Option<String>,
}

/// Public event search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PublicEventQuery {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::csv_ids::deserialize")]
    pub categories: Option<Vec<i64>>,
    pub paid: Option<bool>,
    #[serde(default, deserialize_with = "super::date_time_opt::deserialize")]
    pub range_start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "super::date_time_opt::deserialize")]
    pub range_end: Option<NaiveDateTime>,
    pub only_available: Option<bool>,
    pub sort: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Admin event search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdminEventQuery {
    #[serde(default, deserialize_with = "super::csv_ids::deserialize")]
    pub users: Option<Vec<i64>>,
    #[serde(default, deserialize_with = "super::csv_strings::deserialize")]
    pub states: Option<Vec<String>>,
    #[serde(default, deserialize_with = "super::csv_ids::deserialize")]
    pub categories: Option<Vec<i64>>,
    #[serde(default, deserialize_with = "super::date_time_opt::deserialize")]
    pub range_start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "super::date_time_opt::deserialize")]
    pub range_end: Option<NaiveDateTime>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Composable event filter applied by the repository search query.
/// Each field is independent; `None` means the predicate is skipped.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub text: Option<String>,
    pub categories: Option<Vec<i64>>,
    pub paid: Option<bool>,
    pub range_start: Option<NaiveDateTime>,
    pub range_end: Option<NaiveDateTime>,
    pub only_available: bool,
    pub initiators: Option<Vec<i64>>,
    pub states: Option<Vec<EventState>>,
}

/// Event listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSort {
    EventDate,
    Views,
}

impl EventSort {
    /// Parse the public API sort parameter; anything but VIEWS falls back
    /// to event date ordering.
    pub fn from_param(sort: Option<&str>) -> Self {
        match sort {
            Some(s) if s.eq_ignore_ascii_case("views") => EventSort::Views,
            _ => EventSort::EventDate,
        }
    }
}
