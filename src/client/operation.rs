//! Request and response types for analyzer operations.

use std::fmt;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::error::AnalysisError;

/// Which analyzer to run on which document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    analyzer_name: String,
    document_url: String,
}

impl AnalysisRequest {
    /// Create a request. The analyzer name must not be empty; the document
    /// URL is fetched by the service, not by this client.
    pub fn new(
        analyzer_name: impl Into<String>,
        document_url: impl Into<String>,
    ) -> Result<Self, AnalysisError> {
        let analyzer_name = analyzer_name.into();
        if analyzer_name.trim().is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "analyzer name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            analyzer_name,
            document_url: document_url.into(),
        })
    }

    pub fn analyzer_name(&self) -> &str {
        &self.analyzer_name
    }

    pub fn document_url(&self) -> &str {
        &self.document_url
    }

    pub(crate) fn body(&self) -> AnalyzeBody<'_> {
        AnalyzeBody {
            url: &self.document_url,
        }
    }
}

/// JSON body of an analyze request.
#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeBody<'a> {
    pub url: &'a str,
}

/// Raw outcome of submitting a document.
///
/// A non-success status is not an error by itself; check [`is_success`]
/// before relying on the operation id.
///
/// [`is_success`]: Submission::is_success
#[derive(Debug, Clone)]
pub struct Submission {
    pub status: StatusCode,
    pub body: Value,
}

impl Submission {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The operation id to poll.
    ///
    /// Fails with [`AnalysisError::Http`] if the submission was rejected and
    /// with [`AnalysisError::MissingField`] if the body has no string `id`.
    pub fn operation_id(&self) -> Result<&str, AnalysisError> {
        if !self.is_success() {
            return Err(AnalysisError::Http {
                status: self.status,
                body: body_text(&self.body),
            });
        }

        self.body
            .get("id")
            .and_then(Value::as_str)
            .ok_or(AnalysisError::MissingField("id"))
    }
}

/// Status reported by the service for an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Running,
    Succeeded,
    Failed,
    /// Any other reported value, e.g. `NotStarted` or `Cancelled`.
    Other(String),
    /// The response carried no string `status` field.
    Missing,
}

impl OperationStatus {
    /// Read the `status` field of a result body.
    pub fn from_body(body: &Value) -> Self {
        match body.get("status").and_then(Value::as_str) {
            Some("Running") => Self::Running,
            Some("Succeeded") => Self::Succeeded,
            Some("Failed") => Self::Failed,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Missing,
        }
    }

    /// Only `Running` keeps the poll loop going; every other value ends it.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Other(s) => write!(f, "{}", s),
            Self::Missing => write!(f, "<no status>"),
        }
    }
}

/// One snapshot of a server-side operation, as read by a result poll.
#[derive(Debug, Clone)]
pub struct AnalysisOperation {
    /// The id that was polled, exactly as returned by submission.
    pub id: String,
    pub status: OperationStatus,
    /// HTTP status of the poll response this snapshot came from.
    pub http_status: StatusCode,
    /// Full response body.
    pub body: Value,
}

impl AnalysisOperation {
    pub(crate) fn from_response(id: &str, http_status: StatusCode, body: Value) -> Self {
        Self {
            id: id.to_string(),
            status: OperationStatus::from_body(&body),
            http_status,
            body,
        }
    }

    /// The analysis payload, if the service included one.
    pub fn result(&self) -> Option<&Value> {
        self.body.get("result")
    }
}

fn body_text(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
