//! Participation request model and related types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

/// Participation request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Rejected,
    Canceled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Confirmed => "CONFIRMED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RequestStatus::Pending),
            "CONFIRMED" => Ok(RequestStatus::Confirmed),
            "REJECTED" => Ok(RequestStatus::Rejected),
            "CANCELED" => Ok(RequestStatus::Canceled),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for RequestStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for RequestStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RequestStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Participation request row
#[derive(Debug, Clone, FromRow)]
pub struct Request {
    pub id: i64,
    pub created: NaiveDateTime,
    pub event_id: i64,
    pub requester_id: i64,
    pub status: RequestStatus,
}

/// Participation request projection returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipationRequestDto {
    pub id: i64,
    #[serde(with = "super::date_time")]
    pub created: NaiveDateTime,
    pub event: i64,
    pub requester: i64,
    pub status: RequestStatus,
}

impl From<&Request> for ParticipationRequestDto {
    fn from(request: &Request) -> Self {
        ParticipationRequestDto {
            id: request.id,
            created: request.created,
            event: request.event_id,
            requester: request.requester_id,
            status: request.status,
        }
    }
}

impl From<Request> for ParticipationRequestDto {
    fn from(request: Request) -> Self {
        ParticipationRequestDto::from(&request)
    }
}

/// Owner decision over a batch of pending requests
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRequestStatusUpdateRequest {
    pub request_ids: Vec<i64>,
    pub status: RequestStatus,
}

/// Outcome of a batch status update, cascade rejections included
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRequestStatusUpdateResult {
    pub confirmed_requests: Vec<ParticipationRequestDto>,
    pub rejected_requests: Vec<ParticipationRequestDto>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_request_status_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Confirmed,
            RequestStatus::Rejected,
            RequestStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), status);
        }
        assert!("APPROVED".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_participation_request_dto_shape() {
        let request = Request {
            id: 11,
            created: NaiveDate::from_ymd_opt(2025, 4, 5)
                .unwrap()
                .and_hms_opt(12, 0, 1)
                .unwrap(),
            event_id: 3,
            requester_id: 9,
            status: RequestStatus::Pending,
        };

        let json = serde_json::to_value(ParticipationRequestDto::from(&request)).unwrap();
        assert_eq!(json["created"], "2025-04-05 12:00:01");
        assert_eq!(json["event"], 3);
        assert_eq!(json["requester"], 9);
        assert_eq!(json["status"], "PENDING");
    }
}
