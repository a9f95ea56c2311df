use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "license-resolver",
    about = "Resolve the licenses of third-party content against an approved-license policy",
    version
)]
pub struct Cli {
    /// Dependency list, one content id per line; `-` reads stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Config file [default: ./.license-resolver/config.toml, fallback ~/.config/license-resolver/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ids sent per provider request
    #[arg(long, value_name = "N")]
    pub batch: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Minimum ClearlyDefined score for automatic approval
    #[arg(long, value_name = "SCORE")]
    pub confidence: Option<u32>,

    /// Project on whose behalf the foundation is queried
    #[arg(long)]
    pub project: Option<String>,

    /// Abort on the first provider failure instead of skipping it
    #[arg(long)]
    pub fail_fast: bool,

    /// Provider requests allowed in flight at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Also write the CSV summary to FILE
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Show all content (not just problems); repeat for debug logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Csv,
}

impl Cli {
    /// Default log directive when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
