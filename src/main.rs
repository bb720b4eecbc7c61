//! gh-jira-bridge - GitHub Issues to Jira sync
//!
//! Main entry point for the gh-jira-bridge CLI. Every flag falls back to an
//! environment variable so the binary runs unchanged inside a workflow step.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use gh_jira_bridge::config::{into_config_error, BridgeConfig, ConfigInputs, RunMode};
use gh_jira_bridge::integrations::{GitHubAdapter, GitHubApi, JiraAdapter, JiraApi};
use gh_jira_bridge::output::OutputSink;
use gh_jira_bridge::sync::{BulkSyncer, IssueSyncer, SyncOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Exit code for invalid or missing configuration
const EXIT_CONFIG: u8 = 2;

/// Exit code for a failed sync
const EXIT_FAILURE: u8 = 1;

/// Mirror GitHub issues into Jira, one-way, using `jira:<KEY>` labels as state
#[derive(Parser, Debug)]
#[command(name = "gh-jira-bridge")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Issue to sync (ignored with --sync-all)
    #[arg(long, env = "ISSUE_NUMBER")]
    issue_number: Option<u64>,

    /// GitHub token with issues:write
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// GitHub REST endpoint (default: https://api.github.com)
    #[arg(long, env = "GITHUB_API_URL")]
    github_api_url: Option<String>,

    /// Jira site URL, e.g. https://acme.atlassian.net
    #[arg(long, env = "JIRA_BASE_URL")]
    jira_base_url: Option<String>,

    /// Jira account email
    #[arg(long, env = "JIRA_USER_EMAIL")]
    jira_user_email: Option<String>,

    /// Jira API token
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    jira_api_token: Option<String>,

    /// Target Jira project key
    #[arg(long, env = "JIRA_PROJECT_KEY")]
    jira_project_key: Option<String>,

    /// Log intended writes without performing any
    #[arg(
        long,
        env = "DRY_RUN",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    dry_run: bool,

    /// Sync every open issue in the repository
    #[arg(
        long,
        env = "SYNC_ALL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    sync_all: bool,

    /// Comment on and close each GitHub issue after syncing
    #[arg(
        long,
        env = "CLOSE_AFTER_SYNC",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "true",
        default_missing_value = "true"
    )]
    close_after_sync: bool,

    /// Also sync closed issues that have no sync label
    #[arg(
        long = "sync-closed",
        env = "SYNC_CLOSED_ISSUES",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    sync_closed_issues: bool,

    /// Issue type when no type label matches (default: Task)
    #[arg(long, env = "DEFAULT_ISSUE_TYPE")]
    default_issue_type: Option<String>,

    /// YAML file overriding the label mapping tables
    #[arg(long, env = "JIRA_MAPPING_FILE")]
    mapping_file: Option<PathBuf>,

    /// File receiving key=value result lines
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,
}

impl Cli {
    fn into_inputs(self) -> ConfigInputs {
        ConfigInputs {
            repository: self.repository,
            issue_number: self.issue_number,
            github_token: self.github_token,
            github_api_url: self.github_api_url,
            jira_base_url: self.jira_base_url,
            jira_user_email: self.jira_user_email,
            jira_api_token: self.jira_api_token,
            jira_project_key: self.jira_project_key,
            dry_run: self.dry_run,
            sync_all: self.sync_all,
            close_after_sync: self.close_after_sync,
            sync_closed_issues: self.sync_closed_issues,
            default_issue_type: self.default_issue_type,
            mapping_file: self.mapping_file,
            output_file: self.output_file,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = gh_jira_bridge::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    let config = match BridgeConfig::from_inputs(cli.into_inputs()) {
        Ok(config) => config,
        Err(errors) => {
            eprintln!("Error: {}", into_config_error(&errors));
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match run(config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILURE),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Run the configured sync; `Ok(false)` means some issues failed
async fn run(config: BridgeConfig) -> anyhow::Result<bool> {
    let github: Arc<dyn GitHubApi> = Arc::new(GitHubAdapter::new(config.github.clone())?);
    let jira: Arc<dyn JiraApi> = Arc::new(JiraAdapter::new(config.jira.clone())?);
    let sink = OutputSink::new(config.output_file.clone());

    if config.sync.dry_run {
        warn!("Dry run: no issue will be created, labelled or closed");
    }
    info!(
        repository = %format!("{}/{}", config.github.owner, config.github.repo),
        project = %config.sync.project_key,
        "Starting sync"
    );

    let syncer = IssueSyncer::new(github, jira, config.sync);

    match config.mode {
        RunMode::Single(number) => {
            let outcome = match syncer.sync_issue_number(number).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    sink.write_failure(&e)?;
                    return Err(e.into());
                }
            };
            info!(issue = number, "#{}: {}", number, outcome);
            sink.write_outcome(&outcome)?;
            println!("#{}: {}", number, outcome);
            Ok(true)
        }
        RunMode::Bulk => {
            let report = BulkSyncer::new(syncer).sync_all_unsynced().await?;
            sink.write_stats(&report.stats)?;

            println!(
                "Synced: {}  Skipped: {}  Failed: {}",
                report.stats.synced, report.stats.skipped, report.stats.failed
            );
            for (number, outcome) in report
                .results
                .iter()
                .filter(|(_, o)| matches!(o, SyncOutcome::Failed { .. }))
            {
                error!(issue = number, "#{}: {}", number, outcome);
            }

            Ok(!report.stats.has_failures())
        }
    }
}
