//! ICAO airport identifiers.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::BriefError;

static ICAO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9]{4}$").unwrap());

/// True when `code` is exactly four uppercase ASCII letters or digits.
pub fn is_valid_icao(code: &str) -> bool {
    ICAO_RE.is_match(code)
}

/// A validated four character airport identifier.
///
/// Input is never normalised: `kjfk` is rejected rather than upper-cased, so
/// whatever the user typed is exactly what goes on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AirportCode(String);

impl AirportCode {
    pub fn parse(code: &str) -> Result<Self, BriefError> {
        if is_valid_icao(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(BriefError::InvalidIcao {
                code: code.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AirportCode {
    type Err = BriefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AirportCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
