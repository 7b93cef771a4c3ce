//! The analyze command.

use std::time::Duration;

use console::style;
use tracing::debug;

use cu_analyze::workflow;
use cu_analyze::{AnalysisClient, AnalysisRequest, ServiceConfig, WaitPolicy};

use super::progress::ConsoleProgress;
use super::Cli;

/// Run the full submit, poll, report sequence.
///
/// Configuration is resolved before any request is made; a missing
/// endpoint or key aborts here.
pub async fn cmd_analyze(cli: Cli) -> anyhow::Result<()> {
    let mut config = ServiceConfig::from_env()?;
    if let Some(version) = &cli.api_version {
        config = config.with_api_version(version.as_str());
    }

    let policy = apply_policy_overrides(WaitPolicy::default(), &cli);
    let request = AnalysisRequest::new(cli.analyzer, cli.url)?;

    debug!(verbose = cli.verbose, ?config, ?policy, "Resolved configuration");

    let client = AnalysisClient::new(config)?;
    let mut progress = ConsoleProgress::new();
    let mut out = std::io::stdout();

    let outcome = tokio::select! {
        result = workflow::run(&client, &request, &policy, &mut progress, &mut out) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    // Errors and Ctrl-C both skip `finished`, so the spinner may still be up
    progress.clear();

    match outcome {
        Some(result) => {
            result?;
            Ok(())
        }
        None => {
            println!("{} Cancelled", style("!").yellow());
            anyhow::bail!("interrupted while waiting for analysis");
        }
    }
}

fn apply_policy_overrides(mut policy: WaitPolicy, cli: &Cli) -> WaitPolicy {
    if let Some(ms) = cli.poll_interval_ms {
        policy = policy.with_interval(Duration::from_millis(ms));
    }
    if let Some(n) = cli.max_attempts {
        policy = policy.with_max_attempts(n);
    }
    if let Some(secs) = cli.timeout_secs {
        policy = policy.with_timeout(Duration::from_secs(secs));
    }
    policy
}
