//! Event management service: owner editing, admin moderation, public search
//! and the participation-request confirmation workflow

use chrono::{Duration, NaiveDateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        event::{
            AdminEventQuery, AdminStateAction, EventFilter, EventFullDto, EventShortDto,
            EventSort, EventState, NewEventDto, PublicEventQuery, UpdateEventAdminRequest,
            UpdateEventUserRequest, UserStateAction,
        },
        request::{
            EventRequestStatusUpdateRequest, EventRequestStatusUpdateResult,
            ParticipationRequestDto, Request, RequestStatus,
        },
    },
    repository::Repository,
    services::stats_client::StatsClient,
};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
    stats_client: StatsClient,
}

impl EventsService {
    pub fn new(repository: Repository, stats_client: StatsClient) -> Self {
        Self {
            repository,
            stats_client,
        }
    }

    /// Create a new event in PENDING state
    pub async fn create(&self, user_id: i64, new: &NewEventDto) -> AppResult<EventFullDto> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.categories.get_by_id(new.category).await?;
        ensure_event_date(new.event_date, 2, Utc::now().naive_utc())?;

        let event = self
            .repository
            .events
            .create(user_id, new, Utc::now().naive_utc())
            .await?;

        Ok(self.repository.events.details(event.id).await?.into())
    }

    /// List the events a user initiated
    pub async fn list_by_initiator(
        &self,
        user_id: i64,
        from: Option<i64>,
        size: Option<i64>,
    ) -> AppResult<Vec<EventShortDto>> {
        self.repository.users.get_by_id(user_id).await?;
        let (from, size) = super::page_params(from, size);

        let rows = self
            .repository
            .events
            .list_by_initiator(user_id, from, size)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one of the user's own events
    pub async fn get_by_initiator(&self, user_id: i64, event_id: i64) -> AppResult<EventFullDto> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository
            .events
            .get_by_initiator_and_id(user_id, event_id)
            .await?;

        Ok(self.repository.events.details(event_id).await?.into())
    }

    /// Owner update; only pending or canceled events may change
    pub async fn update_by_initiator(
        &self,
        user_id: i64,
        event_id: i64,
        update: &UpdateEventUserRequest,
    ) -> AppResult<EventFullDto> {
        self.repository.users.get_by_id(user_id).await?;
        let mut event = self
            .repository
            .events
            .get_by_initiator_and_id(user_id, event_id)
            .await?;

        if !matches!(event.state, EventState::Pending | EventState::Canceled) {
            tracing::warn!(
                "Event {} is {} and cannot be edited by its owner",
                event_id,
                event.state
            );
            return Err(AppError::Conflict(
                "Only pending or canceled events can be changed".to_string(),
            ));
        }

        if let Some(event_date) = update.event_date {
            ensure_event_date(event_date, 2, Utc::now().naive_utc())?;
            event.event_date = event_date;
        }
        if let Some(annotation) = &update.annotation {
            event.annotation = annotation.clone();
        }
        if let Some(category) = update.category {
            self.repository.categories.get_by_id(category).await?;
            event.category_id = category;
        }
        if let Some(description) = &update.description {
            event.description = description.clone();
        }
        if let Some(paid) = update.paid {
            event.paid = paid;
        }
        if let Some(participant_limit) = update.participant_limit {
            event.participant_limit = participant_limit;
        }
        if let Some(title) = &update.title {
            event.title = title.clone();
        }
        if let Some(action) = update.state_action {
            event.state = match action {
                UserStateAction::SendToReview => EventState::Pending,
                UserStateAction::CancelReview => EventState::Canceled,
            };
        }

        self.repository.events.save(&event).await?;
        Ok(self.repository.events.details(event_id).await?.into())
    }

    /// List participation requests targeting one of the user's own events
    pub async fn owner_requests(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> AppResult<Vec<ParticipationRequestDto>> {
        self.repository
            .events
            .get_by_initiator_and_id(user_id, event_id)
            .await?;

        let requests = self.repository.requests.list_by_event(event_id).await?;
        Ok(requests.iter().map(Into::into).collect())
    }

    /// Apply an owner's batch confirm/reject decision to pending requests.
    ///
    /// Events without a participant limit or with moderation disabled take
    /// the pass-through path: the requested ids are echoed back as confirmed
    /// and nothing is persisted. Otherwise the decision is planned in memory
    /// against the current confirmed count and written in one transaction,
    /// so a mid-batch conflict leaves no partial state behind.
    pub async fn update_request_statuses(
        &self,
        user_id: i64,
        event_id: i64,
        update: &EventRequestStatusUpdateRequest,
    ) -> AppResult<EventRequestStatusUpdateResult> {
        let event = self
            .repository
            .events
            .get_by_initiator_and_id(user_id, event_id)
            .await?;

        if bypasses_moderation(event.participant_limit, event.request_moderation) {
            let requests = self
                .repository
                .requests
                .list_by_ids(&update.request_ids)
                .await?;
            return Ok(EventRequestStatusUpdateResult {
                confirmed_requests: requests.iter().map(Into::into).collect(),
                rejected_requests: Vec::new(),
            });
        }

        let confirmed_count = self.repository.requests.count_confirmed(event_id).await?;
        let to_update = self
            .repository
            .requests
            .list_by_ids(&update.request_ids)
            .await?;
        let event_pending = self
            .repository
            .requests
            .list_pending_by_event(event_id)
            .await?;

        let plan = plan_status_update(
            event.participant_limit,
            confirmed_count,
            update.status,
            to_update,
            event_pending,
        )?;

        let confirmed_ids: Vec<i64> = plan.confirmed.iter().map(|r| r.id).collect();
        let rejected_ids: Vec<i64> = plan.rejected.iter().map(|r| r.id).collect();
        self.repository
            .requests
            .apply_status_updates(&confirmed_ids, &rejected_ids)
            .await?;

        Ok(EventRequestStatusUpdateResult {
            confirmed_requests: plan.confirmed.iter().map(Into::into).collect(),
            rejected_requests: plan.rejected.iter().map(Into::into).collect(),
        })
    }

    /// Public search over published events; records a hit with the stats
    /// service without blocking the response
    pub async fn search_public(
        &self,
        query: &PublicEventQuery,
        uri: &str,
        ip: &str,
    ) -> AppResult<Vec<EventShortDto>> {
        if let (Some(start), Some(end)) = (query.range_start, query.range_end) {
            if end < start {
                tracing::warn!("rangeEnd {} precedes rangeStart {}", end, start);
                return Err(AppError::Validation(
                    "rangeEnd must not precede rangeStart".to_string(),
                ));
            }
        }

        let filter = EventFilter {
            text: query.text.clone(),
            categories: query.categories.clone(),
            paid: query.paid,
            range_start: query.range_start,
            range_end: query.range_end,
            only_available: query.only_available.unwrap_or(false),
            initiators: None,
            states: Some(vec![EventState::Published]),
        };
        let sort = EventSort::from_param(query.sort.as_deref());
        let (from, size) = super::page_params(query.from, query.size);

        let rows = self.repository.events.search(&filter, sort, from, size).await?;

        self.stats_client.record_hit(uri, ip);

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Public single-event fetch; published events only. Every fetch counts
    /// as one view and records a hit.
    pub async fn get_published(&self, id: i64, uri: &str, ip: &str) -> AppResult<EventFullDto> {
        let row = self.repository.events.details_published(id).await?;

        self.stats_client.record_hit(uri, ip);
        self.repository.events.increment_views(id).await?;

        let mut dto: EventFullDto = row.into();
        dto.views += 1;
        Ok(dto)
    }

    /// Admin listing with filters; confirmed counts are recomputed from the
    /// requests table rather than trusted from the event row
    pub async fn search_admin(&self, query: &AdminEventQuery) -> AppResult<Vec<EventFullDto>> {
        let states = match &query.states {
            Some(states) => Some(
                states
                    .iter()
                    .map(|s| s.parse::<EventState>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(AppError::Validation)?,
            ),
            None => None,
        };

        let filter = EventFilter {
            text: None,
            categories: query.categories.clone(),
            paid: None,
            range_start: query.range_start,
            range_end: query.range_end,
            only_available: false,
            initiators: query.users.clone(),
            states,
        };
        let (from, size) = super::page_params(query.from, query.size);

        let rows = self
            .repository
            .events
            .search(&filter, EventSort::EventDate, from, size)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let confirmed = self.repository.requests.count_confirmed(row.id).await?;
            let mut dto: EventFullDto = row.into();
            dto.confirmed_requests = confirmed;
            result.push(dto);
        }
        Ok(result)
    }

    /// Admin update with publish/reject moderation actions
    pub async fn update_by_admin(
        &self,
        event_id: i64,
        update: &UpdateEventAdminRequest,
    ) -> AppResult<EventFullDto> {
        let mut event = self.repository.events.get_by_id(event_id).await?;

        if let Some(annotation) = &update.annotation {
            event.annotation = annotation.clone();
        }
        if let Some(description) = &update.description {
            event.description = description.clone();
        }
        if let Some(title) = &update.title {
            event.title = title.clone();
        }
        if let Some(category) = update.category {
            self.repository.categories.get_by_id(category).await?;
            event.category_id = category;
        }
        if let Some(location) = &update.location {
            let location = self
                .repository
                .events
                .insert_location(location.lat, location.lon)
                .await?;
            event.location_id = location.id;
        }
        if let Some(event_date) = update.event_date {
            ensure_event_date(event_date, 1, Utc::now().naive_utc())?;
            event.event_date = event_date;
        }
        if let Some(paid) = update.paid {
            event.paid = paid;
        }
        if let Some(participant_limit) = update.participant_limit {
            event.participant_limit = participant_limit;
        }
        if let Some(request_moderation) = update.request_moderation {
            event.request_moderation = request_moderation;
        }

        if let Some(action) = update.state_action {
            match action {
                AdminStateAction::PublishEvent => {
                    if event.state != EventState::Pending {
                        tracing::warn!(
                            "Event {} is {} and cannot be published",
                            event_id,
                            event.state
                        );
                        return Err(AppError::Conflict(format!(
                            "Cannot publish the event because it is in state {}",
                            event.state
                        )));
                    }
                    event.state = EventState::Published;
                    event.published_on = Some(Utc::now().naive_utc());
                }
                AdminStateAction::RejectEvent => {
                    if event.state == EventState::Published {
                        return Err(AppError::Conflict(
                            "Cannot reject the event because it is already published".to_string(),
                        ));
                    }
                    event.state = EventState::Canceled;
                }
            }
        }

        self.repository.events.save(&event).await?;
        Ok(self.repository.events.details(event_id).await?.into())
    }
}

/// Reject mutating calls whose event date is closer than `min_hours` from now
fn ensure_event_date(
    event_date: NaiveDateTime,
    min_hours: i64,
    now: NaiveDateTime,
) -> AppResult<()> {
    if event_date < now + Duration::hours(min_hours) {
        tracing::warn!(
            "Event date {} is less than {} hours from now",
            event_date,
            min_hours
        );
        return Err(AppError::Validation(format!(
            "Event date must be at least {} hours in the future",
            min_hours
        )));
    }
    Ok(())
}

/// Events without a participant limit or with moderation disabled skip the
/// capacity workflow entirely
fn bypasses_moderation(participant_limit: i32, request_moderation: bool) -> bool {
    participant_limit == 0 || !request_moderation
}

/// Planned outcome of a batch status decision
#[derive(Debug)]
struct StatusUpdatePlan {
    confirmed: Vec<Request>,
    rejected: Vec<Request>,
}

/// Decide the fate of each request in the owner's id list, in list order,
/// against the event's remaining capacity. Once the confirmed count reaches
/// the limit, every still-pending request of the event is rejected and the
/// loop stops (capacity-exhaustion cascade).
fn plan_status_update(
    participant_limit: i32,
    mut confirmed_count: i64,
    target: RequestStatus,
    to_update: Vec<Request>,
    event_pending: Vec<Request>,
) -> AppResult<StatusUpdatePlan> {
    let limit = i64::from(participant_limit);
    let mut confirmed = Vec::new();
    let mut rejected = Vec::new();
    let mut cascade = false;

    for mut request in to_update {
        if request.status != RequestStatus::Pending {
            return Err(AppError::Conflict(
                "Request must have status PENDING".to_string(),
            ));
        }

        match target {
            RequestStatus::Confirmed => {
                if confirmed_count >= limit {
                    return Err(AppError::Conflict(
                        "The participant limit has been reached".to_string(),
                    ));
                }
                request.status = RequestStatus::Confirmed;
                confirmed_count += 1;
                confirmed.push(request);

                if confirmed_count >= limit {
                    cascade = true;
                    break;
                }
            }
            RequestStatus::Rejected => {
                request.status = RequestStatus::Rejected;
                rejected.push(request);
            }
            _ => {
                return Err(AppError::Conflict(
                    "Invalid status for update".to_string(),
                ));
            }
        }
    }

    if cascade {
        let decided = |id: i64| {
            confirmed.iter().any(|r| r.id == id) || rejected.iter().any(|r| r.id == id)
        };
        let leftovers: Vec<Request> = event_pending
            .into_iter()
            .filter(|r| !decided(r.id))
            .collect();
        for mut request in leftovers {
            request.status = RequestStatus::Rejected;
            rejected.push(request);
        }
    }

    Ok(StatusUpdatePlan { confirmed, rejected })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn dt(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn pending(id: i64, event_id: i64) -> Request {
        Request {
            id,
            created: dt(8),
            event_id,
            requester_id: 100 + id,
            status: RequestStatus::Pending,
        }
    }

    #[test]
    fn test_event_date_two_hour_rule() {
        let now = dt(10);
        assert!(ensure_event_date(dt(11), 2, now).is_err());
        assert!(ensure_event_date(dt(12), 2, now).is_ok());
        assert!(ensure_event_date(dt(13), 2, now).is_ok());
    }

    #[test]
    fn test_event_date_one_hour_rule() {
        let now = dt(10);
        assert!(ensure_event_date(dt(10), 1, now).is_err());
        assert!(ensure_event_date(dt(11), 1, now).is_ok());
    }

    #[test]
    fn test_moderation_bypass() {
        assert!(bypasses_moderation(0, true));
        assert!(bypasses_moderation(5, false));
        assert!(bypasses_moderation(0, false));
        assert!(!bypasses_moderation(5, true));
    }

    #[test]
    fn test_confirm_within_capacity() {
        let plan = plan_status_update(
            5,
            0,
            RequestStatus::Confirmed,
            vec![pending(1, 7), pending(2, 7)],
            vec![pending(1, 7), pending(2, 7), pending(3, 7)],
        )
        .unwrap();

        assert_eq!(plan.confirmed.len(), 2);
        assert!(plan.rejected.is_empty());
        assert!(plan
            .confirmed
            .iter()
            .all(|r| r.status == RequestStatus::Confirmed));
    }

    #[test]
    fn test_capacity_cascade_rejects_remaining_pending() {
        // Limit 1, two requested ids: the first confirmation exhausts
        // capacity, the second id and any other pending request cascade
        // into rejection.
        let plan = plan_status_update(
            1,
            0,
            RequestStatus::Confirmed,
            vec![pending(1, 7), pending(2, 7)],
            vec![pending(1, 7), pending(2, 7), pending(3, 7)],
        )
        .unwrap();

        assert_eq!(plan.confirmed.len(), 1);
        assert_eq!(plan.confirmed[0].id, 1);
        let rejected_ids: Vec<i64> = plan.rejected.iter().map(|r| r.id).collect();
        assert_eq!(rejected_ids, vec![2, 3]);
        assert!(plan
            .rejected
            .iter()
            .all(|r| r.status == RequestStatus::Rejected));
    }

    #[test]
    fn test_confirm_fails_when_limit_already_reached() {
        let err = plan_status_update(
            2,
            2,
            RequestStatus::Confirmed,
            vec![pending(1, 7)],
            vec![pending(1, 7)],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_non_pending_request_is_a_conflict() {
        let mut request = pending(1, 7);
        request.status = RequestStatus::Canceled;
        let err = plan_status_update(5, 0, RequestStatus::Confirmed, vec![request], Vec::new())
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_invalid_target_status() {
        let err = plan_status_update(
            5,
            0,
            RequestStatus::Canceled,
            vec![pending(1, 7)],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_reject_on_full_event_does_not_cascade() {
        // Rejecting is always allowed, even once capacity is gone, and it
        // must not touch pending requests outside the given id list.
        let plan = plan_status_update(
            1,
            1,
            RequestStatus::Rejected,
            vec![pending(2, 7)],
            vec![pending(2, 7), pending(3, 7)],
        )
        .unwrap();

        assert!(plan.confirmed.is_empty());
        let rejected_ids: Vec<i64> = plan.rejected.iter().map(|r| r.id).collect();
        assert_eq!(rejected_ids, vec![2]);
    }

    #[test]
    fn test_reject_target_marks_rejected() {
        let plan = plan_status_update(
            5,
            0,
            RequestStatus::Rejected,
            vec![pending(1, 7), pending(2, 7)],
            vec![pending(1, 7), pending(2, 7)],
        )
        .unwrap();

        assert!(plan.confirmed.is_empty());
        assert_eq!(plan.rejected.len(), 2);
        assert!(plan
            .rejected
            .iter()
            .all(|r| r.status == RequestStatus::Rejected));
    }
}
