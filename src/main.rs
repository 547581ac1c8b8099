//! stackfetch - Search Stack Overflow from the terminal
//!
//! Asks for a search query, lists the top matching questions and prints the
//! best answers of the chosen one as readable text.

use std::io;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stackfetch::app::App;
use stackfetch::cache::CacheStore;
use stackfetch::cli::{Cli, StartupConfig};
use stackfetch::data::StackExchangeClient;
use stackfetch::fetch::AnswerFetcher;

/// Sets up logging to stderr. `RUST_LOG` wins over the `-v` flags.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(StartupConfig::log_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.verbose);

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cache = CacheStore::open(&config.cache_file);
    let client = StackExchangeClient::new(&config.site).with_base_url(&config.api_url);
    let mut app = App::new(&config, AnswerFetcher::new(client, cache));

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();

    match app.run(&mut input, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {}", e);
            ExitCode::FAILURE
        }
    }
}
