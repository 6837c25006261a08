//! Runtime settings, read from the environment.

use std::env;
use std::time::Duration;

use crate::error::BriefError;

pub const WEBHOOK_URL_VAR: &str = "SLACK_WEBHOOK_URL";
pub const WEATHER_BASE_VAR: &str = "AVIATION_WEATHER_BASE";
pub const TIMEOUT_VAR: &str = "METAR_BRIEF_TIMEOUT_SECS";

const DEFAULT_WEATHER_BASE: &str = "https://aviationweather.gov";

/// Where to fetch reports from and where to deliver the briefing.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Slack incoming webhook. Treated as a secret and never logged.
    pub webhook_url: Option<String>,
    /// Base URL of the aviation weather data API, without trailing slash.
    pub weather_base: String,
    /// Per-request timeout; `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

impl Settings {
    pub fn from_env() -> Result<Self, BriefError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup, so callers other than the process
    /// environment (tests, embedding programs) can supply values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BriefError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let weather_base = non_empty(WEATHER_BASE_VAR)
            .unwrap_or_else(|| DEFAULT_WEATHER_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout = match non_empty(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    BriefError::config(format!(
                        "{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}"
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            webhook_url: non_empty(WEBHOOK_URL_VAR),
            weather_base,
            timeout,
        })
    }

    /// The webhook URL, or a configuration error naming the variable to set.
    pub fn require_webhook(&self) -> Result<&str, BriefError> {
        self.webhook_url.as_deref().ok_or_else(|| {
            BriefError::config(format!(
                "{WEBHOOK_URL_VAR} not found in environment variables"
            ))
        })
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client, BriefError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| BriefError::config(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.weather_base, "https://aviationweather.gov");
        assert!(settings.webhook_url.is_none());
        assert!(settings.timeout.is_none());
        assert!(matches!(
            settings.require_webhook(),
            Err(BriefError::Config { .. })
        ));
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            (WEBHOOK_URL_VAR, "https://hooks.slack.test/T000/B000"),
            (WEATHER_BASE_VAR, "http://127.0.0.1:8080/"),
            (TIMEOUT_VAR, "15"),
        ]))
        .unwrap();
        assert_eq!(
            settings.require_webhook().unwrap(),
            "https://hooks.slack.test/T000/B000"
        );
        assert_eq!(settings.weather_base, "http://127.0.0.1:8080");
        assert_eq!(settings.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn blank_webhook_counts_as_missing() {
        let settings = Settings::from_lookup(lookup(&[(WEBHOOK_URL_VAR, "  ")])).unwrap();
        assert!(settings.webhook_url.is_none());
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_VAR));
    }
}
