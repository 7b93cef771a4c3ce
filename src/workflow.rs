//! The submit, poll, report sequence.

use std::io::Write;

use tracing::warn;

use crate::client::{AnalysisClient, AnalysisOperation, AnalysisRequest, Submission};
use crate::config::WaitPolicy;
use crate::error::AnalysisError;
use crate::report::report;

/// Observer for workflow progress. All methods default to no-ops.
pub trait Progress {
    /// Called before the document is submitted.
    fn submitting(&mut self, _request: &AnalysisRequest) {}

    /// Called with the raw submission outcome.
    fn submitted(&mut self, _submission: &Submission) {}

    /// Called for every poll snapshot, `attempt` starting at 1.
    fn polled(&mut self, _attempt: u32, _snapshot: &AnalysisOperation) {}

    /// Called once the final snapshot is known, before it is reported.
    fn finished(&mut self, _operation: &AnalysisOperation) {}
}

/// Progress observer that ignores everything.
pub struct Silent;

impl Progress for Silent {}

/// Submit `request`, wait for the operation under `policy`, and report it to
/// `out`.
///
/// A rejected submission ends the workflow with [`AnalysisError::Http`]
/// before any poll is issued. A terminal status other than `Succeeded` is
/// not an error: the final snapshot is returned and nothing is written.
pub async fn run<P, W>(
    client: &AnalysisClient,
    request: &AnalysisRequest,
    policy: &WaitPolicy,
    progress: &mut P,
    out: &mut W,
) -> Result<AnalysisOperation, AnalysisError>
where
    P: Progress + ?Sized,
    W: Write,
{
    progress.submitting(request);
    let submission = client.submit(request).await?;
    progress.submitted(&submission);

    let operation_id = submission.operation_id()?;

    let operation = client
        .poll_with(
            request.analyzer_name(),
            operation_id,
            policy,
            |attempt, snapshot| progress.polled(attempt, snapshot),
        )
        .await?;

    progress.finished(&operation);

    if !report(&operation, out)? {
        warn!(
            "Operation {} ended with status {}; no result reported",
            operation.id, operation.status
        );
    }

    Ok(operation)
}
