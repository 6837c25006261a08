//! metar-brief binary
//!
//! Thin CLI wrapper around the library. Parses the ICAO argument, sets up
//! logging and invokes `metar_brief::run`.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use metar_brief::{BriefError, RunOptions, Settings};
use tracing_subscriber::EnvFilter;

/// Get a full weather brief for an airport.
#[derive(Debug, Parser)]
#[command(name = "metar-brief", version, about)]
struct Cli {
    /// ICAO code of the airport (e.g., KJFK, EGLL, FAOR)
    icao: String,

    /// Print the briefing without posting it to Slack
    #[arg(long)]
    dry_run: bool,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn brief(cli: &Cli) -> anyhow::Result<()> {
    let settings = Settings::from_env().context("failed to load settings")?;
    metar_brief::run(
        &cli.icao,
        &settings,
        RunOptions {
            dry_run: cli.dry_run,
        },
    )
    .await
    .with_context(|| format!("weather brief for {} failed", cli.icao))?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; variables may come from the real environment.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match brief(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            let code = e.downcast_ref::<BriefError>().map_or(1, BriefError::exit_code);
            ExitCode::from(code)
        }
    }
}
