//! CLI parser and entry point.

mod analyze;
mod progress;

use clap::Parser;

/// Analyzer used when none is given.
pub const DEFAULT_ANALYZER: &str = "travel-insurance-analyzer";

/// Sample document used when none is given.
pub const DEFAULT_DOCUMENT_URL: &str = "https://github.com/microsoftlearning/mslearn-ai-document-intelligence/raw/main/Labfiles/05-content-understanding/forms/rest-form.pdf";

#[derive(Parser)]
#[command(name = "cu-analyze")]
#[command(about = "Analyze a document with a content-understanding analyzer")]
#[command(version)]
pub struct Cli {
    /// Analyzer to run
    #[arg(short, long, default_value = DEFAULT_ANALYZER)]
    pub analyzer: String,

    /// Document URL (fetched by the service, not locally)
    #[arg(short, long, default_value = DEFAULT_DOCUMENT_URL)]
    pub url: String,

    /// API version to request
    #[arg(long, env = "CONTENT_UNDERSTANDING_API_VERSION")]
    pub api_version: Option<String>,

    /// Delay between result polls in milliseconds [default: 1000]
    #[arg(long, env = "CU_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Give up after this many result polls
    #[arg(long, env = "CU_POLL_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    /// Give up after polling for this many seconds
    #[arg(long, env = "CU_POLL_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Parse arguments and run the analysis.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    analyze::cmd_analyze(cli).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_uses_sample_document() {
        let cli = Cli::try_parse_from(["cu-analyze"]).unwrap();
        assert_eq!(cli.analyzer, DEFAULT_ANALYZER);
        assert_eq!(cli.url, DEFAULT_DOCUMENT_URL);
        assert!(cli.max_attempts.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_tuning_flags_read_environment() {
        let command = Cli::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .and_then(|env| env.to_str())
                .map(str::to_string)
        };

        assert_eq!(
            env_of("api_version").as_deref(),
            Some("CONTENT_UNDERSTANDING_API_VERSION")
        );
        assert_eq!(env_of("poll_interval_ms").as_deref(), Some("CU_POLL_INTERVAL_MS"));
        assert_eq!(env_of("max_attempts").as_deref(), Some("CU_POLL_MAX_ATTEMPTS"));
        assert_eq!(env_of("timeout_secs").as_deref(), Some("CU_POLL_TIMEOUT_SECS"));
        assert_eq!(env_of("analyzer"), None);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "cu-analyze",
            "--analyzer",
            "invoice-analyzer",
            "--url",
            "https://docs.example/invoice.pdf",
            "--poll-interval-ms",
            "250",
            "--max-attempts",
            "40",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.analyzer, "invoice-analyzer");
        assert_eq!(cli.url, "https://docs.example/invoice.pdf");
        assert_eq!(cli.poll_interval_ms, Some(250));
        assert_eq!(cli.max_attempts, Some(40));
        assert!(cli.verbose);
    }
}
