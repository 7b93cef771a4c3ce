//! Terminal progress display for the analysis workflow.

use std::time::Duration;

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use cu_analyze::client::{AnalysisOperation, AnalysisRequest, OperationStatus, Submission};
use cu_analyze::workflow::Progress;

/// Prints workflow milestones to stdout.
///
/// On a terminal, polling is shown as a spinner. Otherwise each further poll
/// prints a `...` line.
pub struct ConsoleProgress {
    spinner: Option<ProgressBar>,
    ticking: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let spinner = Term::stdout().is_term().then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg} [{elapsed}]")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        });

        Self {
            spinner,
            ticking: false,
        }
    }

    #[cfg(test)]
    fn with_spinner(spinner: ProgressBar) -> Self {
        Self {
            spinner: Some(spinner),
            ticking: false,
        }
    }

    /// Remove the spinner line, if one is showing.
    pub fn clear(&mut self) {
        if let Some(pb) = &self.spinner {
            if self.ticking {
                pb.finish_and_clear();
                self.ticking = false;
            }
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ConsoleProgress {
    fn submitting(&mut self, request: &AnalysisRequest) {
        println!("Analyzing document...");
        println!(
            "  {} {} {}",
            style("→").cyan(),
            style(request.analyzer_name()).bold(),
            style(request.document_url()).dim()
        );
    }

    fn submitted(&mut self, submission: &Submission) {
        if submission.is_success() {
            println!("  {} HTTP {}", style("✓").green(), submission.status);
            println!("Getting results...");
        } else {
            println!("  {} HTTP {}", style("✗").red(), submission.status);
        }
    }

    fn polled(&mut self, attempt: u32, snapshot: &AnalysisOperation) {
        if attempt == 1 {
            let glyph = if snapshot.http_status.is_success() {
                style("✓").green()
            } else {
                style("✗").red()
            };
            println!("  {} HTTP {}", glyph, snapshot.http_status);
        }

        if snapshot.status.is_terminal() {
            return;
        }

        match &self.spinner {
            Some(pb) => {
                pb.set_message(format!(
                    "Waiting for analysis (poll {}, status {})",
                    attempt, snapshot.status
                ));
                if !self.ticking {
                    pb.enable_steady_tick(Duration::from_millis(100));
                    self.ticking = true;
                }
            }
            None => println!("..."),
        }
    }

    fn finished(&mut self, operation: &AnalysisOperation) {
        self.clear();

        let status = match &operation.status {
            OperationStatus::Succeeded => style(operation.status.to_string()).green(),
            OperationStatus::Failed => style(operation.status.to_string()).red(),
            _ => style(operation.status.to_string()).yellow(),
        };
        println!("  Operation {}: {}", style(&operation.id).dim(), status);
    }
}
