//! Raw METAR/TAF retrieval from the aviation weather data API.

use std::fmt;

use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::debug;

use crate::config::Settings;
use crate::error::BriefError;
use crate::icao::AirportCode;

/// Which product a report is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Metar,
    Taf,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Metar => f.write_str("METAR"),
            ReportKind::Taf => f.write_str("TAF"),
        }
    }
}

/// Report text exactly as the provider sent it, trimmed. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct RawReport {
    pub kind: ReportKind,
    pub text: String,
}

#[derive(Deserialize, Debug)]
struct TafResponse {
    #[serde(default)]
    data: Option<TafData>,
}

#[derive(Deserialize, Debug)]
struct TafData {
    #[serde(rename = "TAF", default)]
    tafs: Vec<TafEntry>,
}

#[derive(Deserialize, Debug)]
struct TafEntry {
    #[serde(default)]
    raw_text: Option<String>,
}

/// HTTP client bound to one weather data provider.
#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base: String,
}

impl WeatherClient {
    pub fn new(settings: &Settings) -> Result<Self, BriefError> {
        Ok(Self {
            http: settings.http_client()?,
            base: settings.weather_base.clone(),
        })
    }

    fn metar_url(&self, code: &AirportCode) -> String {
        format!(
            "{}/api/data/metar?ids={}&format=raw",
            self.base,
            urlencoding::encode(code.as_str())
        )
    }

    fn taf_url(&self, code: &AirportCode) -> String {
        format!(
            "{}/api/data/taf?ids={}&format=xml",
            self.base,
            urlencoding::encode(code.as_str())
        )
    }

    async fn get_text(&self, url: &str, kind: ReportKind) -> Result<String, BriefError> {
        debug!(%url, "requesting {kind}");
        let network = |source| {
            debug!("fetching {kind} failed: {source}");
            BriefError::Network { kind, source }
        };
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(network)?;
        resp.text().await.map_err(network)
    }

    /// Fetch the latest METAR for `code`.
    pub async fn fetch_metar(&self, code: &AirportCode) -> Result<RawReport, BriefError> {
        let body = self
            .get_text(&self.metar_url(code), ReportKind::Metar)
            .await?;
        let text = parse_metar_body(&body).ok_or_else(|| BriefError::EmptyReport {
            kind: ReportKind::Metar,
            code: code.to_string(),
        })?;
        Ok(RawReport {
            kind: ReportKind::Metar,
            text,
        })
    }

    /// Fetch the current TAF(s) for `code`.
    pub async fn fetch_taf(&self, code: &AirportCode) -> Result<RawReport, BriefError> {
        let body = self.get_text(&self.taf_url(code), ReportKind::Taf).await?;
        let empty = || BriefError::EmptyReport {
            kind: ReportKind::Taf,
            code: code.to_string(),
        };
        if body.trim().is_empty() {
            return Err(empty());
        }
        let text = parse_taf_xml(&body)?.ok_or_else(empty)?;
        Ok(RawReport {
            kind: ReportKind::Taf,
            text,
        })
    }
}

/// First non-blank line of a raw-format METAR response; the provider lists
/// the most recent observation first.
pub fn parse_metar_body(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Extract and join every `raw_text` in a TAF XML response. `Ok(None)` when
/// the document is well formed but holds no forecast.
pub fn parse_taf_xml(xml: &str) -> Result<Option<String>, BriefError> {
    let resp: TafResponse = from_str(xml).map_err(|e| {
        debug!("parsing TAF failed: {e}");
        BriefError::Parse {
            kind: ReportKind::Taf,
            message: e.to_string(),
        }
    })?;
    let texts: Vec<String> = resp
        .data
        .map(|d| d.tafs)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|t| t.raw_text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if texts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(texts.join("\n")))
    }
}
