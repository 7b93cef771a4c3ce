//! HTTP client for the content-understanding analyzer API.
//!
//! Submits a document URL to a named analyzer, then polls the results
//! endpoint until the operation leaves the `Running` state.

mod operation;

pub use operation::{AnalysisOperation, AnalysisRequest, OperationStatus, Submission};

use std::time::Instant;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ServiceConfig, WaitPolicy};
use crate::error::AnalysisError;

/// Header carrying the static subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("cu-analyze/", env!("CARGO_PKG_VERSION"));

/// Client for one analysis service.
pub struct AnalysisClient {
    config: ServiceConfig,
    client: Client,
}

impl AnalysisClient {
    /// Create a client for the given service configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .gzip(true)
            .build()?;

        Ok(Self { config, client })
    }

    /// Submit a document for analysis.
    ///
    /// The returned [`Submission`] carries the HTTP status and body whether
    /// or not the service accepted the request.
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<Submission, AnalysisError> {
        let url = self.config.analyze_url(request.analyzer_name());
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, self.config.key())
            .json(&request.body())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let body = if status.is_success() {
            serde_json::from_str(&text)?
        } else {
            warn!("Analyze request rejected with HTTP {}", status);
            lenient_json(text)
        };

        if let Some(id) = body.get("id").and_then(Value::as_str) {
            info!(
                "Submitted {} to analyzer {} (operation {})",
                request.document_url(),
                request.analyzer_name(),
                id
            );
        }

        Ok(Submission { status, body })
    }

    /// Fetch a single snapshot of an operation.
    pub async fn fetch(
        &self,
        analyzer_name: &str,
        operation_id: &str,
    ) -> Result<AnalysisOperation, AnalysisError> {
        let url = self.config.result_url(analyzer_name, operation_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(SUBSCRIPTION_KEY_HEADER, self.config.key())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Result request for {} returned HTTP {}", operation_id, status);
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(AnalysisOperation::from_response(operation_id, status, body))
    }

    /// Poll an operation until it reports a terminal status.
    pub async fn poll(
        &self,
        analyzer_name: &str,
        operation_id: &str,
        policy: &WaitPolicy,
    ) -> Result<AnalysisOperation, AnalysisError> {
        self.poll_with(analyzer_name, operation_id, policy, |_, _| {})
            .await
    }

    /// Poll an operation, calling `on_snapshot` with the 1-based attempt
    /// number and every snapshot read (including the terminal one).
    ///
    /// Only `Running` continues the loop. The same `operation_id` is used for
    /// every request. Dropping the returned future cancels polling.
    pub async fn poll_with<F>(
        &self,
        analyzer_name: &str,
        operation_id: &str,
        policy: &WaitPolicy,
        mut on_snapshot: F,
    ) -> Result<AnalysisOperation, AnalysisError>
    where
        F: FnMut(u32, &AnalysisOperation),
    {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            let snapshot = self.fetch(analyzer_name, operation_id).await?;
            attempts += 1;
            on_snapshot(attempts, &snapshot);

            if snapshot.status.is_terminal() {
                info!(
                    "Operation {} finished with status {} after {} polls",
                    operation_id, snapshot.status, attempts
                );
                return Ok(snapshot);
            }

            let elapsed = started.elapsed();
            if !policy.allows_another(attempts, elapsed) {
                return Err(AnalysisError::PollLimitExceeded { attempts, elapsed });
            }

            debug!("Operation {} still running (poll {})", operation_id, attempts);
            if !policy.interval.is_zero() {
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}

/// Parse a body as JSON, keeping it as a plain string when it isn't.
fn lenient_json(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
