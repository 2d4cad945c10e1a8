//! Participation request service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        event::EventState,
        request::{ParticipationRequestDto, RequestStatus},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Submit a participation request for an event.
    ///
    /// Requests against unpublished events, the requester's own events,
    /// duplicated requests and full events are all conflicts. When the
    /// event does not moderate requests or has no participant limit the
    /// request is confirmed immediately.
    pub async fn create(&self, user_id: i64, event_id: i64) -> AppResult<ParticipationRequestDto> {
        self.repository.users.get_by_id(user_id).await?;
        let event = self.repository.events.get_by_id(event_id).await?;

        if event.initiator_id == user_id {
            tracing::warn!("User {} owns event {}", user_id, event_id);
            return Err(AppError::Conflict(
                "The initiator cannot request participation in their own event".to_string(),
            ));
        }
        if event.state != EventState::Published {
            tracing::warn!("Event {} is {}", event_id, event.state);
            return Err(AppError::Conflict(
                "Cannot participate in an unpublished event".to_string(),
            ));
        }
        if self
            .repository
            .requests
            .exists_by_requester_and_event(user_id, event_id)
            .await?
        {
            return Err(AppError::Conflict(
                "A request for this event already exists".to_string(),
            ));
        }
        if event.participant_limit > 0 {
            let confirmed = self.repository.requests.count_confirmed(event_id).await?;
            if confirmed >= i64::from(event.participant_limit) {
                return Err(AppError::Conflict(
                    "The participant limit has been reached".to_string(),
                ));
            }
        }

        let status = if !event.request_moderation || event.participant_limit == 0 {
            RequestStatus::Confirmed
        } else {
            RequestStatus::Pending
        };

        let request = self
            .repository
            .requests
            .create(event_id, user_id, Utc::now().naive_utc(), status)
            .await?;
        Ok(request.into())
    }

    /// List the user's own participation requests
    pub async fn list_own(&self, user_id: i64) -> AppResult<Vec<ParticipationRequestDto>> {
        self.repository.users.get_by_id(user_id).await?;
        let rows = self.repository.requests.list_by_requester(user_id).await?;
        Ok(rows.iter().map(Into::into).collect())
    }

    /// Cancel one of the user's own requests. A request belonging to a
    /// different user is reported as not found, not as forbidden.
    pub async fn cancel(&self, user_id: i64, request_id: i64) -> AppResult<ParticipationRequestDto> {
        self.repository.users.get_by_id(user_id).await?;
        let request = self.repository.requests.get_by_id(request_id).await?;

        if request.requester_id != user_id {
            return Err(AppError::NotFound(format!(
                "Request with id {} not found",
                request_id
            )));
        }

        let updated = self
            .repository
            .requests
            .set_status(request_id, RequestStatus::Canceled)
            .await?;
        Ok(updated.into())
    }
}
