//! Errors from talking to the analysis service.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid analysis request: {0}")]
    InvalidRequest(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("response is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("operation still running after {attempts} polls ({elapsed:?})")]
    PollLimitExceeded { attempts: u32, elapsed: Duration },

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
