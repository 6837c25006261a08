//! Error type shared by every stage of the briefing pipeline.

use thiserror::Error;

use crate::fetch::ReportKind;

/// Everything that can stop a briefing run.
#[derive(Error, Debug)]
pub enum BriefError {
    /// The airport identifier does not look like an ICAO code.
    #[error("invalid ICAO code {code:?}: expected 4 uppercase letters or digits")]
    InvalidIcao { code: String },

    /// Missing or malformed settings.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Transport failure or non-success status while fetching a report.
    #[error("network error fetching {kind}: {source}")]
    Network {
        kind: ReportKind,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered, but there was no report in the response.
    #[error("{kind} data not available for {code} (empty response)")]
    EmptyReport { kind: ReportKind, code: String },

    /// The provider's TAF document could not be read.
    #[error("failed to parse {kind} response: {message}")]
    Parse { kind: ReportKind, message: String },

    /// The METAR text is not a report the decoder recognises. The briefing
    /// still goes out with the raw report.
    #[error("failed to decode METAR {raw:?}: {message}")]
    Decode { raw: String, message: String },

    /// The webhook rejected the briefing or could not be reached.
    #[error("failed to deliver briefing to webhook: {source}")]
    Delivery {
        #[source]
        source: reqwest::Error,
    },
}

impl BriefError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn decode<R: Into<String>, S: Into<String>>(raw: R, message: S) -> Self {
        Self::Decode {
            raw: raw.into(),
            message: message.into(),
        }
    }

    /// Process exit code: 2 for bad input, 1 for everything that failed at runtime.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            BriefError::InvalidIcao { .. } => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_icao_is_a_usage_error() {
        let err = BriefError::InvalidIcao {
            code: "kjfk".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("\"kjfk\""));
    }

    #[test]
    fn runtime_failures_exit_with_one() {
        assert_eq!(BriefError::config("missing SLACK_WEBHOOK_URL").exit_code(), 1);
        assert_eq!(BriefError::decode("XXXX", "no time group").exit_code(), 1);
        let empty = BriefError::EmptyReport {
            kind: ReportKind::Taf,
            code: "EGLL".into(),
        };
        assert_eq!(empty.exit_code(), 1);
        assert_eq!(
            empty.to_string(),
            "TAF data not available for EGLL (empty response)"
        );
    }
}
