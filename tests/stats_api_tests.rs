//! Stats service integration tests
//!
//! These run against a live gather-stats instance started separately.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:9090";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_stats_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_record_hit_and_aggregate() {
    let client = Client::new();
    let uri = format!("/events/{}", chrono::Utc::now().timestamp_micros());

    for ip in ["10.0.0.1", "10.0.0.1", "10.0.0.2"] {
        let response = client
            .post(format!("{}/hit", BASE_URL))
            .json(&json!({
                "app": "gather",
                "uri": uri,
                "ip": ip,
                "timestamp": "2025-05-10 12:00:00"
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .query(&[
            ("start", "2025-05-01 00:00:00"),
            ("end", "2025-05-31 00:00:00"),
            ("uris", &uri),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["hits"], 3);

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .query(&[
            ("start", "2025-05-01 00:00:00"),
            ("end", "2025-05-31 00:00:00"),
            ("uris", &uri),
            ("unique", &"true".to_string()),
        ])
        .send()
        .await
        .expect("Failed to send request");

    let body: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert_eq!(body[0]["hits"], 2);
}

#[tokio::test]
#[ignore]
async fn test_stats_window_start_after_end() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .query(&[
            ("start", "2025-05-31 00:00:00"),
            ("end", "2025-05-01 00:00:00"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}
