//! Command-line interface parsing for stackfetch
//!
//! Every argument is optional. Anything not given on the command line is
//! asked for interactively.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::cache::CacheStore;
use crate::data::stack_exchange::{DEFAULT_SITE, STACK_EXCHANGE_BASE_URL};

/// Number of questions listed when `--results` is not given
pub const DEFAULT_RESULTS: usize = 5;

/// Upper bound for `--results`; one API page holds 30 items
pub const MAX_RESULTS: usize = 30;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A count argument was zero
    #[error("Invalid --{0}: must be at least 1")]
    ZeroCount(&'static str),

    /// Too many questions requested
    #[error("Invalid --results: {0} is more than the maximum of 30")]
    TooManyResults(usize),

    /// The site name was empty
    #[error("Invalid --site: site name cannot be empty")]
    EmptySite,
}

/// stackfetch - Search Stack Overflow and read the best answers in your terminal
#[derive(Parser, Debug)]
#[command(name = "stackfetch")]
#[command(about = "Search Stack Overflow and read ranked, cached answers")]
#[command(version)]
pub struct Cli {
    /// Search terms matched against question titles (prompted for when omitted)
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,

    /// Number of answers to show (prompted for when omitted)
    #[arg(short = 'n', long, value_name = "N")]
    pub count: Option<usize>,

    /// Number of questions to list
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_RESULTS)]
    pub results: usize,

    /// Stack Exchange site to search, e.g. superuser or serverfault
    #[arg(long, default_value = DEFAULT_SITE)]
    pub site: String,

    /// Location of the answer cache file
    #[arg(long, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,

    /// Base URL of the Stack Exchange API
    #[arg(long, value_name = "URL", default_value = STACK_EXCHANGE_BASE_URL, hide = true)]
    pub api_url: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print without colors or bold text
    #[arg(long)]
    pub no_color: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Search query, if given on the command line
    pub query: Option<String>,
    /// Answer count, if given on the command line
    pub count: Option<usize>,
    /// Number of questions to list
    pub results: usize,
    /// Stack Exchange site
    pub site: String,
    /// Cache file location
    pub cache_file: PathBuf,
    /// API base URL
    pub api_url: String,
    /// Whether output is styled
    pub color: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with defaults filled in
    /// * `Err(CliError)` if a count is zero, too many results are requested
    ///   or the site is blank
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.count == Some(0) {
            return Err(CliError::ZeroCount("count"));
        }
        if cli.results == 0 {
            return Err(CliError::ZeroCount("results"));
        }
        if cli.results > MAX_RESULTS {
            return Err(CliError::TooManyResults(cli.results));
        }

        let site = cli.site.trim();
        if site.is_empty() {
            return Err(CliError::EmptySite);
        }

        let query = cli.query.join(" ");
        let query = if query.trim().is_empty() {
            None
        } else {
            Some(query.trim().to_string())
        };

        Ok(StartupConfig {
            query,
            count: cli.count,
            results: cli.results,
            site: site.to_string(),
            cache_file: cli
                .cache_file
                .clone()
                .unwrap_or_else(CacheStore::default_path),
            api_url: cli.api_url.clone(),
            color: !cli.no_color,
        })
    }

    /// Log filter directive for the requested verbosity
    pub fn log_directive(verbose: u8) -> &'static str {
        match verbose {
            0 => "stackfetch=warn",
            1 => "stackfetch=info",
            _ => "stackfetch=debug",
        }
    }
}
