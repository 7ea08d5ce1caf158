//! API client for communicating with the monitor agent

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// HTTP client for the monitor's session API
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request expecting JSON
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a GET request expecting plain text (CSV export)
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.text().await.context("Failed to read response")
    }

    /// Make a bodyless POST request
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }
}

// API response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub phase: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEntry {
    pub message: String,
    pub detected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: String,
    pub is_anomalous: bool,
    pub latency_ms: Vec<f64>,
    pub bandwidth_mbps: Vec<f64>,
    pub packet_loss_pct: Vec<f64>,
    pub active_connections: Vec<f64>,
    pub timestamps: Vec<Option<DateTime<Utc>>>,
    pub alerts: Vec<AlertEntry>,
    pub ticks: u64,
    pub skipped_ticks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_snapshot_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/session/snapshot")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "phase": "running",
                    "is_anomalous": false,
                    "latency_ms": [0.0, 52.1],
                    "bandwidth_mbps": [0.0, 98.3],
                    "packet_loss_pct": [0.0, 0.4],
                    "active_connections": [0.0, 36.0],
                    "timestamps": [null, "2025-03-14T09:26:53Z"],
                    "alerts": [],
                    "ticks": 1,
                    "skipped_ticks": 0
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let snapshot: Snapshot = client.get("/session/snapshot").await.unwrap();

        mock.assert_async().await;
        assert_eq!(snapshot.phase, "running");
        assert_eq!(snapshot.ticks, 1);
        assert_eq!(snapshot.latency_ms, vec![0.0, 52.1]);
        assert!(snapshot.timestamps[0].is_none());
        assert!(snapshot.timestamps[1].is_some());
    }

    #[tokio::test]
    async fn test_post_start_parses_session_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/session/start")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"phase": "connecting", "message": "session starting"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let response: SessionResponse = client.post("/session/start").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.phase, "connecting");
    }

    #[tokio::test]
    async fn test_get_text_returns_csv_body() {
        let csv = "timestamp,latency_ms,bandwidth_mbps,packet_loss_pct,active_connections\n,0.00,0.00,0.00,0\n";
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/session/export")
            .with_status(200)
            .with_header("content-type", "text/csv; charset=utf-8")
            .with_body(csv)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let body = client.get_text("/session/export").await.unwrap();

        mock.assert_async().await;
        assert_eq!(body, csv);
    }

    #[tokio::test]
    async fn test_api_error_surfaces_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/session/snapshot")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.get::<Snapshot>("/session/snapshot").await.unwrap_err();

        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
