use std::time::Duration;

use serde::de::DeserializeOwned;

use super::types::{ErrorResponse, SaveRequest, SaveResponse, StatsSnapshot, YearsResponse};
use super::ApiError;
use crate::config::ServerConfig;
use crate::stats::StatsQuery;

const SAVE_PATH: &str = "/api/save-pomodoros";
const STATS_PATH: &str = "/api/stats";
const YEARS_PATH: &str = "/api/years";

/// HTTP client for the Pomodoro statistics backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(server: &ServerConfig) -> Result<Self, ApiError> {
        Self::new(&server.base_url, server.timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/save-pomodoros` with a form-encoded body.
    pub async fn save_pomodoros(&self, request: &SaveRequest) -> Result<SaveResponse, ApiError> {
        let url = self.url(SAVE_PATH);
        let response = self
            .http
            .post(&url)
            .form(request)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        read_json(url, response).await
    }

    /// `GET /api/stats`, filtered by whatever the query carries.
    pub async fn fetch_stats(&self, query: &StatsQuery) -> Result<StatsSnapshot, ApiError> {
        let url = self.url(STATS_PATH);
        let response = self
            .http
            .get(&url)
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        read_json(url, response).await
    }

    /// `GET /api/years`, as the backend orders them.
    pub async fn fetch_years(&self) -> Result<Vec<i32>, ApiError> {
        let url = self.url(YEARS_PATH);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let parsed: YearsResponse = read_json(url, response).await?;
        Ok(parsed.years)
    }
}

async fn read_json<T: DeserializeOwned>(
    url: String,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(|source| ApiError::Transport {
        url: url.clone(),
        source,
    })?;

    if !status.is_success() {
        let detail = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => err.detail,
            Err(_) => body.chars().take(200).collect(),
        };
        return Err(ApiError::Status {
            url,
            status,
            detail,
        });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Parse { url, source })
}
