//! OneBusAway client error types.

/// Errors from the OneBusAway HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ObaError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configured base URL is unusable
    #[error("invalid base URL {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status, in the HTTP status line or the envelope
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by OneBusAway API")]
    RateLimited,

    /// Invalid API key
    #[error("unauthorized (invalid API key)")]
    Unauthorized,
}

impl ObaError {
    /// Classify an error status reported by the API.
    pub(crate) fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => ObaError::Unauthorized,
            429 => ObaError::RateLimited,
            _ => ObaError::Api {
                status,
                message: message.into(),
            },
        }
    }
}
