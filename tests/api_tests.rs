//! API integration tests
//!
//! These run against a live server and database started separately.

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Utc::now().timestamp_micros())
}

fn future_date(hours: i64) -> String {
    (Utc::now().naive_utc() + Duration::hours(hours))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Helper creating a user and returning its id
async fn create_user(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/admin/users", BASE_URL))
        .json(&json!({
            "email": unique_email(name),
            "name": name
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

/// Helper creating a category and returning its id
async fn create_category(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/admin/categories", BASE_URL))
        .json(&json!({
            "name": format!("{}-{}", name, Utc::now().timestamp_micros())
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

/// Helper creating a pending event and returning its id
async fn create_event(client: &Client, user_id: i64, category_id: i64) -> i64 {
    create_event_with(client, user_id, category_id, 0, true).await
}

/// Helper creating a pending event with explicit capacity settings
async fn create_event_with(
    client: &Client,
    user_id: i64,
    category_id: i64,
    participant_limit: i32,
    request_moderation: bool,
) -> i64 {
    let response = client
        .post(format!("{}/users/{}/events", BASE_URL, user_id))
        .json(&json!({
            "annotation": "An annotation long enough to pass validation",
            "category": category_id,
            "description": "A description long enough to pass validation",
            "eventDate": future_date(48),
            "location": { "lat": 55.75, "lon": 37.61 },
            "participantLimit": participant_limit,
            "requestModeration": request_moderation,
            "title": "Integration test event"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

/// Helper submitting a participation request and returning (id, status)
async fn create_request(client: &Client, user_id: i64, event_id: i64) -> (i64, String) {
    let response = client
        .post(format!(
            "{}/users/{}/requests?eventId={}",
            BASE_URL, user_id, event_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    (
        body["id"].as_i64().expect("No id in response"),
        body["status"].as_str().expect("No status in response").to_string(),
    )
}

/// Helper publishing an event through the admin surface
async fn publish_event(client: &Client, event_id: i64) {
    let response = client
        .patch(format!("{}/admin/events/{}", BASE_URL, event_id))
        .json(&json!({ "stateAction": "PUBLISH_EVENT" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_user_and_duplicate_email_conflict() {
    let client = Client::new();
    let email = unique_email("dup");

    let response = client
        .post(format!("{}/admin/users", BASE_URL))
        .json(&json!({ "email": email, "name": "First" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/admin/users", BASE_URL))
        .json(&json!({ "email": email, "name": "Second" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "CONFLICT");
    assert_eq!(body["reason"], "Integrity constraint has been violated.");
}

#[tokio::test]
#[ignore]
async fn test_create_user_invalid_email() {
    let client = Client::new();

    let response = client
        .post(format!("{}/admin/users", BASE_URL))
        .json(&json!({ "email": "not-an-email", "name": "Broken" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "BAD_REQUEST");
}

#[tokio::test]
#[ignore]
async fn test_category_rename_conflict() {
    let client = Client::new();
    let first = create_category(&client, "rename-a").await;
    let second = create_category(&client, "rename-b").await;

    let first_name: Value = client
        .get(format!("{}/categories/{}", BASE_URL, first))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let response = client
        .patch(format!("{}/admin/categories/{}", BASE_URL, second))
        .json(&json!({ "name": first_name["name"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_event_lifecycle_pending_to_published() {
    let client = Client::new();
    let user_id = create_user(&client, "lifecycle").await;
    let category_id = create_category(&client, "lifecycle").await;
    let event_id = create_event(&client, user_id, category_id).await;

    // Freshly created events are pending and invisible publicly
    let response = client
        .get(format!("{}/users/{}/events/{}", BASE_URL, user_id, event_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["state"], "PENDING");

    let response = client
        .get(format!("{}/events/{}", BASE_URL, event_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    publish_event(&client, event_id).await;

    let response = client
        .get(format!("{}/events/{}", BASE_URL, event_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["state"], "PUBLISHED");
    assert!(body["publishedOn"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_event_date_too_close_is_rejected() {
    let client = Client::new();
    let user_id = create_user(&client, "too-close").await;
    let category_id = create_category(&client, "too-close").await;

    let response = client
        .post(format!("{}/users/{}/events", BASE_URL, user_id))
        .json(&json!({
            "annotation": "An annotation long enough to pass validation",
            "category": category_id,
            "description": "A description long enough to pass validation",
            "eventDate": future_date(1),
            "location": { "lat": 55.75, "lon": 37.61 },
            "title": "Too soon"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_owner_cannot_edit_published_event() {
    let client = Client::new();
    let user_id = create_user(&client, "edit-published").await;
    let category_id = create_category(&client, "edit-published").await;
    let event_id = create_event(&client, user_id, category_id).await;
    publish_event(&client, event_id).await;

    let response = client
        .patch(format!("{}/users/{}/events/{}", BASE_URL, user_id, event_id))
        .json(&json!({ "title": "New title" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_publish_twice_is_a_conflict() {
    let client = Client::new();
    let user_id = create_user(&client, "double-publish").await;
    let category_id = create_category(&client, "double-publish").await;
    let event_id = create_event(&client, user_id, category_id).await;
    publish_event(&client, event_id).await;

    let response = client
        .patch(format!("{}/admin/events/{}", BASE_URL, event_id))
        .json(&json!({ "stateAction": "PUBLISH_EVENT" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_request_own_event_is_a_conflict() {
    let client = Client::new();
    let user_id = create_user(&client, "own-request").await;
    let category_id = create_category(&client, "own-request").await;
    let event_id = create_event(&client, user_id, category_id).await;
    publish_event(&client, event_id).await;

    let response = client
        .post(format!(
            "{}/users/{}/requests?eventId={}",
            BASE_URL, user_id, event_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_request_unpublished_event_is_a_conflict() {
    let client = Client::new();
    let owner_id = create_user(&client, "unpub-owner").await;
    let requester_id = create_user(&client, "unpub-requester").await;
    let category_id = create_category(&client, "unpub").await;
    let event_id = create_event(&client, owner_id, category_id).await;

    let response = client
        .post(format!(
            "{}/users/{}/requests?eventId={}",
            BASE_URL, requester_id, event_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_request_auto_confirmed_without_limit() {
    let client = Client::new();
    let owner_id = create_user(&client, "auto-owner").await;
    let requester_id = create_user(&client, "auto-requester").await;
    let category_id = create_category(&client, "auto").await;
    let event_id = create_event(&client, owner_id, category_id).await;
    publish_event(&client, event_id).await;

    // participantLimit defaults to 0, so the request confirms immediately
    let response = client
        .post(format!(
            "{}/users/{}/requests?eventId={}",
            BASE_URL, requester_id, event_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "CONFIRMED");
    assert_eq!(body["event"], event_id);
    assert_eq!(body["requester"], requester_id);
}

#[tokio::test]
#[ignore]
async fn test_confirmation_cascade_persists_and_full_event_conflicts() {
    let client = Client::new();
    let owner_id = create_user(&client, "cascade-owner").await;
    let first_id = create_user(&client, "cascade-first").await;
    let second_id = create_user(&client, "cascade-second").await;
    let third_id = create_user(&client, "cascade-third").await;
    let category_id = create_category(&client, "cascade").await;
    let event_id = create_event_with(&client, owner_id, category_id, 1, true).await;
    publish_event(&client, event_id).await;

    // With a limit and moderation on, both requests stay pending
    let (first_request, status) = create_request(&client, first_id, event_id).await;
    assert_eq!(status, "PENDING");
    let (second_request, status) = create_request(&client, second_id, event_id).await;
    assert_eq!(status, "PENDING");

    // Confirming both against limit 1 confirms the first and cascades the
    // second into rejection
    let response = client
        .patch(format!(
            "{}/users/{}/events/{}/requests",
            BASE_URL, owner_id, event_id
        ))
        .json(&json!({
            "requestIds": [first_request, second_request],
            "status": "CONFIRMED"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    let confirmed = body["confirmedRequests"].as_array().expect("No confirmed list");
    let rejected = body["rejectedRequests"].as_array().expect("No rejected list");
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0]["id"], first_request);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["id"], second_request);

    // The decision is persisted, not just reported
    let response = client
        .get(format!(
            "{}/users/{}/events/{}/requests",
            BASE_URL, owner_id, event_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    let body: Vec<Value> = response.json().await.expect("Failed to parse response");
    for request in &body {
        if request["id"] == first_request {
            assert_eq!(request["status"], "CONFIRMED");
        }
        if request["id"] == second_request {
            assert_eq!(request["status"], "REJECTED");
        }
    }

    // The event is full now, further requests conflict
    let response = client
        .post(format!(
            "{}/users/{}/requests?eventId={}",
            BASE_URL, third_id, event_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_batch_update_passes_through_without_moderation() {
    let client = Client::new();
    let owner_id = create_user(&client, "bypass-owner").await;
    let requester_id = create_user(&client, "bypass-requester").await;
    let category_id = create_category(&client, "bypass").await;
    let event_id = create_event_with(&client, owner_id, category_id, 5, false).await;
    publish_event(&client, event_id).await;

    // Moderation is off, so the request confirms on creation
    let (request_id, status) = create_request(&client, requester_id, event_id).await;
    assert_eq!(status, "CONFIRMED");

    // A batch decision on such an event echoes the ids back as confirmed
    // and leaves stored statuses alone, even when rejection was asked for
    let response = client
        .patch(format!(
            "{}/users/{}/events/{}/requests",
            BASE_URL, owner_id, event_id
        ))
        .json(&json!({
            "requestIds": [request_id],
            "status": "REJECTED"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    let confirmed = body["confirmedRequests"].as_array().expect("No confirmed list");
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0]["id"], request_id);
    assert!(body["rejectedRequests"].as_array().expect("No rejected list").is_empty());

    let response = client
        .get(format!("{}/users/{}/requests", BASE_URL, requester_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Vec<Value> = response.json().await.expect("Failed to parse response");
    let stored = body
        .iter()
        .find(|r| r["id"] == request_id)
        .expect("Request missing from listing");
    assert_eq!(stored["status"], "CONFIRMED");
}

#[tokio::test]
#[ignore]
async fn test_cancel_own_request() {
    let client = Client::new();
    let owner_id = create_user(&client, "cancel-owner").await;
    let requester_id = create_user(&client, "cancel-requester").await;
    let category_id = create_category(&client, "cancel").await;
    let event_id = create_event(&client, owner_id, category_id).await;
    publish_event(&client, event_id).await;

    let response = client
        .post(format!(
            "{}/users/{}/requests?eventId={}",
            BASE_URL, requester_id, event_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let request_id = body["id"].as_i64().expect("No id in response");

    let response = client
        .patch(format!(
            "{}/users/{}/requests/{}/cancel",
            BASE_URL, requester_id, request_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "CANCELED");

    // Another user cannot see or cancel the request
    let response = client
        .patch(format!(
            "{}/users/{}/requests/{}/cancel",
            BASE_URL, owner_id, request_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_public_search_invalid_range() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/events?rangeStart=2025-06-10 00:00:00&rangeEnd=2025-06-01 00:00:00",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_compilation_crud() {
    let client = Client::new();
    let user_id = create_user(&client, "comp").await;
    let category_id = create_category(&client, "comp").await;
    let event_id = create_event(&client, user_id, category_id).await;
    publish_event(&client, event_id).await;

    let response = client
        .post(format!("{}/admin/compilations", BASE_URL))
        .json(&json!({
            "title": format!("comp-{}", Utc::now().timestamp_micros()),
            "pinned": true,
            "events": [event_id]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let comp_id = body["id"].as_i64().expect("No id in response");
    assert_eq!(body["pinned"], true);
    assert_eq!(body["events"].as_array().map(Vec::len), Some(1));

    let response = client
        .patch(format!("{}/admin/compilations/{}", BASE_URL, comp_id))
        .json(&json!({ "pinned": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["pinned"], false);

    let response = client
        .delete(format!("{}/admin/compilations/{}", BASE_URL, comp_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/compilations/{}", BASE_URL, comp_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_delete_missing_user_returns_not_found_body() {
    let client = Client::new();

    let response = client
        .delete(format!("{}/admin/users/999999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "NOT_FOUND");
    assert_eq!(body["reason"], "Not found.");
    assert!(body["timestamp"].is_string());
}
