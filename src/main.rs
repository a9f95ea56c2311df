//! `license-resolver`: read a dependency list, resolve each component's
//! license against the configured providers, and report what needs review.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config and apply CLI overrides ([`config::load_config`]).
//! 3. Read content ids ([`ids::read_content_ids`]).
//! 4. Resolve them against the providers in priority order ([`LicenseResolver`]).
//! 5. Render the requested report and the optional CSV summary ([`report`]).
//! 6. Exit `0` (everything approved) or `1` (something needs review).

mod cli;

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use license_resolver::config::{load_config, Config};
use license_resolver::ids::read_content_ids;
use license_resolver::provider::USER_AGENT;
use license_resolver::report;
use license_resolver::{FailureMode, LicenseMap, LicenseResolver, ResolveError};

use cli::{Cli, ReportFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let ids = read_content_ids(&cli.input)?;
    if !cli.quiet {
        eprintln!("  {} {} content ids", "→".cyan(), ids.len());
    }

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.resolver.timeout_secs.max(1)))
        .build()?;

    let policy = Arc::new(config.policy.approved_licenses());
    let providers = config.providers.build(&client, policy)?;
    let resolver = LicenseResolver::new(providers, config.resolver.resolve_options());

    let pb = if !cli.quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
        );
        pb.set_message(format!("Querying {}", resolver.provider_names().join(", ")));
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let outcome = resolver.resolve(ids).await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let results = match outcome {
        Ok(results) => results,
        Err(ResolveError::ProviderUnavailable {
            provider,
            source,
            partial,
        }) => {
            eprintln!(
                "{} license data provider `{}` is unavailable: {}",
                "error:".red().bold(),
                provider,
                source
            );
            render(&cli, &partial)?;
            std::process::exit(2);
        }
        Err(err) => return Err(err.into()),
    };

    render(&cli, &results)?;

    let pending = report::review::needs_review(&results);
    if !cli.quiet {
        report::review::render(&pending);
    }

    if !pending.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(batch) = cli.batch {
        config.resolver.batch_size = batch;
    }
    if let Some(timeout) = cli.timeout {
        config.resolver.timeout_secs = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.resolver.max_concurrent_batches = concurrency;
    }
    if cli.fail_fast {
        config.resolver.failure_mode = FailureMode::FailFast;
    }
    if let Some(confidence) = cli.confidence {
        config.providers.confidence_threshold = confidence;
    }
    if let Some(project) = &cli.project {
        config.providers.project = Some(project.clone());
    }
}

fn render(cli: &Cli, results: &LicenseMap) -> Result<()> {
    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(results, &cli.input, cli.verbose > 0, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report::rows(results))?);
        }
        ReportFormat::Csv => {
            report::csv::write_summary(results, &mut std::io::stdout().lock())?;
        }
    }

    if let Some(path) = &cli.summary {
        let file = File::create(path)
            .with_context(|| format!("cannot write summary {}", path.display()))?;
        report::csv::write_summary(results, &mut BufWriter::new(file))?;
    }

    Ok(())
}
