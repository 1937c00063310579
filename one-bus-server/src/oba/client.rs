//! OneBusAway HTTP client.
//!
//! One request per lookup: no retry, no backoff. The API key belongs to
//! the caller and is passed through per request rather than configured.

use std::time::Duration;

use reqwest::Url;
use tracing::debug;

use crate::domain::ArrivalPrediction;

use super::error::ObaError;
use super::types::ArrivalsResponse;

/// Default base URL: the Puget Sound OneBusAway deployment.
pub const DEFAULT_BASE_URL: &str = "https://api.pugetsound.onebusaway.org/api/where";

/// How far back the arrivals window reaches, in minutes.
const MINUTES_BEFORE: u16 = 0;

/// How far ahead the arrivals window reaches, in minutes.
const MINUTES_AFTER: u16 = 120;

/// Configuration for the OneBusAway client.
#[derive(Debug, Clone)]
pub struct ObaConfig {
    /// Base URL for the API, up to and including `/api/where`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ObaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ObaConfig {
    /// Set a custom base URL (for testing or other deployments).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OneBusAway API client.
#[derive(Debug, Clone)]
pub struct ObaClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ObaClient {
    pub fn new(config: ObaConfig) -> Result<Self, ObaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = Url::parse(&config.base_url).map_err(|e| ObaError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ObaError::InvalidBaseUrl {
                url: config.base_url,
                message: "cannot carry a path".to_string(),
            });
        }

        Ok(Self { http, base_url })
    }

    /// `{base}/arrivals-and-departures-for-stop/{stop_id}.json`, with the
    /// stop id percent-encoded as a single path segment.
    fn arrivals_url(&self, stop_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("arrivals-and-departures-for-stop")
                .push(&format!("{stop_id}.json"));
        }
        url
    }

    /// Arrivals expected at a stop in the next two hours.
    ///
    /// # Arguments
    ///
    /// * `stop_id` - OneBusAway stop id, e.g. `1_75403`
    /// * `api_key` - Caller's OneBusAway key, sent as the `key` parameter
    pub async fn arrivals_for_stop(
        &self,
        stop_id: &str,
        api_key: &str,
    ) -> Result<Vec<ArrivalPrediction>, ObaError> {
        let url = self.arrivals_url(stop_id);

        debug!(%url, "fetching arrivals");

        let response = self
            .http
            .get(url)
            .query(&[
                ("key", api_key.to_string()),
                ("minutesBefore", MINUTES_BEFORE.to_string()),
                ("minutesAfter", MINUTES_AFTER.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ObaError::from_status(status.as_u16(), body));
        }

        let body = response.text().await?;

        let parsed: ArrivalsResponse =
            serde_json::from_str(&body).map_err(|e| ObaError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        // The envelope can carry an error under a 200 status line
        if let Some(code) = parsed.code.filter(|c| *c != 200) {
            return Err(ObaError::from_status(code, parsed.text.unwrap_or_default()));
        }

        let data = parsed.data.ok_or_else(|| ObaError::Json {
            message: "response has no data.entry".to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

        Ok(data
            .entry
            .arrivals_and_departures
            .iter()
            .map(|a| a.to_prediction())
            .collect())
    }
}
