use anyhow::Result;
use clap::Parser;
use cli::Cli;
use console::Console;
use dormant_common::observability::{LogConfig, init_logging};
use dormant_config::credentials::load_bearer_token;
use dormant_pipeline::{PipelineOptions, ReportStyle};
use dormant_social::twitter::TwitterApi;
use std::process::ExitCode;
use std::time::Duration;

mod cli;
mod console;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run failed");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let log_path = init_logging(LogConfig {
        emit_stderr: cli.verbose,
        ..LogConfig::default()
    })?;
    tracing::info!(handle = %cli.handle, log = %log_path.display(), "dormant starting");

    // 1) Settings and credentials, before any network traffic
    let cfg = cli.load_config()?;
    let token = load_bearer_token(&cfg, cli.credentials.as_deref())?;
    let style = ReportStyle::new(&cfg.timestamp_format, &cfg.profile_base_url)?;

    // 2) API client
    let api = TwitterApi::with_base_url(&cfg.api_base_url, token)?
        .with_timeout(Duration::from_secs(cfg.request_timeout_secs))
        .with_retries(cfg.max_retries)
        .with_following_page_size(cfg.following_page_size);

    // 3) Resolve, page, enrich, rank
    let options = PipelineOptions {
        concurrency: cfg.concurrency,
        max_pages: cfg.max_pages,
    };
    let mut console = Console::new(&style, std::io::stdout());
    let outcome = dormant_pipeline::run(&api, &cli.handle, options, &mut console).await?;
    console.finish(&outcome)?;

    tracing::info!(
        followers = outcome.followers.len(),
        complete = outcome.interrupted.is_none(),
        "dormant finished"
    );
    Ok(())
}
