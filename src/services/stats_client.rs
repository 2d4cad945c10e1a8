//! HTTP client for the stats service

use chrono::Utc;

use crate::models::stats::EndpointHit;

/// Application tag attached to every recorded hit
pub const APP_NAME: &str = "gather";

/// Fire-and-forget client posting endpoint hits to the stats service
#[derive(Clone)]
pub struct StatsClient {
    http: reqwest::Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Record a hit in the background. A failure is logged but never
    /// surfaces to the caller; statistics must not break the public API.
    pub fn record_hit(&self, uri: &str, ip: &str) {
        let hit = EndpointHit {
            app: APP_NAME.to_string(),
            uri: uri.to_string(),
            ip: ip.to_string(),
            timestamp: Utc::now().naive_utc(),
        };
        let http = self.http.clone();
        let url = format!("{}/hit", self.base_url);

        tokio::spawn(async move {
            match http.post(&url).json(&hit).send().await {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!("Stats service answered {} for {}", response.status(), hit.uri);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to record hit for {}: {}", hit.uri, e);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = StatsClient::new("http://localhost:9090/");
        assert_eq!(client.base_url, "http://localhost:9090");
    }
}
