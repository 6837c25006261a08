//! Metar Brief
//!
//! Core library for building an airport weather briefing: validate an ICAO
//! code, fetch the latest METAR and TAF from AviationWeather.gov, decode the
//! METAR into readable text, print the briefing and post it to a Slack
//! incoming webhook.
//!
//! The binary crate parses arguments and calls [`run`].

pub mod briefing;
pub mod config;
pub mod decoder;
pub mod error;
pub mod fetch;
pub mod icao;
pub mod webhook;

pub use briefing::{Briefing, SlackPayload};
pub use config::Settings;
pub use decoder::{DecodedReport, decode};
pub use error::BriefError;
pub use fetch::{RawReport, ReportKind, WeatherClient};
pub use icao::{AirportCode, is_valid_icao};
pub use webhook::WebhookClient;

use tracing::{error, info};

/// Core result type used throughout the library.
pub type Result<T> = std::result::Result<T, BriefError>;

/// Per-run switches from the command line.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    /// Print the briefing without posting it; no webhook URL is needed.
    pub dry_run: bool,
}

/// Validate, fetch, decode, print and deliver a briefing for `icao`.
///
/// Validation and the webhook setting are checked before any network call,
/// and nothing is posted unless both reports were fetched. A METAR the
/// decoder cannot read is still delivered raw, with a placeholder in place of
/// the decoded section.
pub async fn run(icao: &str, settings: &Settings, options: RunOptions) -> Result<Briefing> {
    let code = AirportCode::parse(icao)?;
    let webhook = if options.dry_run {
        None
    } else {
        Some(WebhookClient::new(settings)?)
    };

    info!("Fetching weather briefing for {code}...");
    let weather = WeatherClient::new(settings)?;
    let metar = weather.fetch_metar(&code).await?;
    let taf = weather.fetch_taf(&code).await?;
    let decoded = match decoder::decode_now(&metar.text) {
        Ok(report) => report.to_string(),
        Err(e @ BriefError::Decode { .. }) => {
            error!("Error decoding METAR: {e}");
            decoder::DECODE_FAILED.to_string()
        }
        Err(e) => return Err(e),
    };

    let briefing = Briefing::new(code, metar.text, taf.text, decoded);
    println!("\n{}", briefing.render_text());

    match webhook {
        Some(client) => client.send(&briefing.to_payload()).await?,
        None => info!("Dry run: briefing not sent."),
    }
    Ok(briefing)
}
