use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single weather request.
///
/// Provider error payloads (`{"cod": "404", ...}`) are not errors unless the
/// strict status policy is in effect; see [`crate::config::StatusPolicy`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("network error while contacting the weather service: {0}")]
    Network(#[source] reqwest::Error),

    #[error("weather service returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("weather service returned a non-JSON body (status {status}): {body}")]
    Decode {
        status: StatusCode,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::Network(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
