//! METAR decoding.
//!
//! The report body is parsed by the [`metar`] crate. This module only does
//! the framing around it: the leading `METAR`/`SPECI` and `COR`/`AUTO`
//! markers, the trailing trend group, resolving `DDHHMMZ` to a full
//! timestamp, and rendering the parsed report as `label: value` lines.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use regex::Regex;

use crate::error::BriefError;
use crate::fetch::ReportKind;

static STATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]{3}$").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2})(\d{2})Z$").unwrap());

/// Placeholder shown in the briefing when the METAR cannot be decoded.
pub const DECODE_FAILED: &str = "Error decoding METAR.";

/// How far ahead of the local clock an observation time may lie before it
/// is taken to belong to an earlier month.
const CLOCK_TOLERANCE_HOURS: i64 = 24;

const WRAPPERS: [&str; 2] = ["Known", "Some"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportType {
    Routine,
    Special,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modifier {
    Automatic,
    Corrected,
}

/// A decoded METAR or SPECI.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedReport {
    pub raw: String,
    pub report_type: ReportType,
    pub modifier: Option<Modifier>,
    pub station: String,
    pub time: DateTime<Utc>,
    /// `NOSIG`, `BECMG ...` or `TEMPO ...`, as written.
    pub trend: Option<String>,
    /// Parsed body groups as `(label, value)`, absent groups left out.
    pub fields: Vec<(&'static str, String)>,
}

/// Decode against the current UTC time.
pub fn decode_now(raw: &str) -> Result<DecodedReport, BriefError> {
    decode(raw, Utc::now())
}

/// Decode `raw`, resolving its day-of-month against `now`.
///
/// A `NIL` report is an [`BriefError::EmptyReport`]; anything else that
/// cannot be read is a [`BriefError::Decode`].
pub fn decode(raw: &str, now: DateTime<Utc>) -> Result<DecodedReport, BriefError> {
    let raw = raw.trim().trim_end_matches('=').trim_end();
    let mut tokens: Vec<&str> = raw.split_whitespace().collect();

    let report_type = match tokens.first() {
        Some(&"SPECI") => ReportType::Special,
        _ => ReportType::Routine,
    };
    if matches!(tokens.first(), Some(&"METAR" | &"SPECI")) {
        tokens.remove(0);
    }

    // COR/AUTO sit before the station in the ICAO layout and after the time
    // group in the US one.
    let mut modifier = None;
    tokens.retain(|t| match *t {
        "COR" => {
            modifier = Some(Modifier::Corrected);
            false
        }
        "AUTO" => {
            modifier = modifier.or(Some(Modifier::Automatic));
            false
        }
        _ => true,
    });

    let station = match tokens.first() {
        Some(t) if STATION_RE.is_match(t) => t.to_string(),
        Some(_) => return Err(BriefError::decode(raw, "missing station identifier")),
        None => return Err(BriefError::decode(raw, "empty report")),
    };
    if tokens.contains(&"NIL") {
        return Err(BriefError::EmptyReport {
            kind: ReportKind::Metar,
            code: station,
        });
    }
    let time = match tokens.get(1) {
        Some(t) => resolve_time(t, now).map_err(|msg| BriefError::decode(raw, msg))?,
        None => return Err(BriefError::decode(raw, "missing observation time")),
    };

    let rmk = tokens.iter().position(|t| *t == "RMK").unwrap_or(tokens.len());
    let trend_at = tokens[..rmk]
        .iter()
        .position(|t| matches!(*t, "NOSIG" | "BECMG" | "TEMPO"));
    let trend = trend_at.map(|at| tokens[at..rmk].join(" "));
    if let Some(at) = trend_at {
        tokens.drain(at..rmk);
    }

    let body = tokens.join(" ");
    let parsed = ::metar::Metar::parse(body.as_str())
        .map_err(|e| BriefError::decode(raw, format!("{e:?}")))?;

    let fields = [
        ("wind", format!("{:?}", parsed.wind)),
        ("visibility", format!("{:?}", parsed.visibility)),
        ("weather", format!("{:?}", parsed.weather)),
        ("sky", format!("{:?}", parsed.cloud_layers)),
        ("temperature", format!("{:?}", parsed.temperature)),
        ("dew point", format!("{:?}", parsed.dewpoint)),
        ("pressure", format!("{:?}", parsed.pressure)),
        ("remarks", format!("{:?}", parsed.remarks)),
    ]
    .into_iter()
    .filter_map(|(label, value)| tidy(&value).map(|v| (label, v)))
    .collect();

    Ok(DecodedReport {
        raw: raw.to_string(),
        report_type,
        modifier,
        station,
        time,
        trend,
        fields,
    })
}

/// Pick the latest month in which `DDHHMMZ` is a real time not more than
/// [`CLOCK_TOLERANCE_HOURS`] ahead of `now`.
fn resolve_time(token: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let caps = TIME_RE
        .captures(token)
        .ok_or_else(|| format!("invalid observation time {token:?}"))?;
    let day: u32 = caps[1].parse().map_err(|_| "bad day".to_string())?;
    let hour: u32 = caps[2].parse().map_err(|_| "bad hour".to_string())?;
    let minute: u32 = caps[3].parse().map_err(|_| "bad minute".to_string())?;
    if hour > 23 || minute > 59 {
        return Err(format!("observation time {token} out of range"));
    }

    let this_month = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .ok_or_else(|| "date out of range".to_string())?;
    let latest = now + Duration::hours(CLOCK_TOLERANCE_HOURS);
    [
        this_month.checked_add_months(Months::new(1)),
        Some(this_month),
        this_month.checked_sub_months(Months::new(1)),
    ]
    .into_iter()
    .flatten()
    .filter_map(|month| month.with_day(day))
    .filter_map(|date| date.and_hms_opt(hour, minute, 0))
    .map(|naive| Utc.from_utc_datetime(&naive))
    .find(|t| *t <= latest)
    .ok_or_else(|| format!("day {day} does not fit the current or previous month"))
}

/// Shorten a `Debug` rendering for display: `Known(..)`/`Some(..)` wrappers,
/// quotes and a single outer `Name { .. }` are dropped. `None` for values
/// that carry nothing (`None`, `Unknown`, `[]`).
fn tidy(debug: &str) -> Option<String> {
    let mut out = String::with_capacity(debug.len());
    let mut dropped = Vec::new();
    for c in debug.chars() {
        match c {
            '(' => {
                let wrapper = WRAPPERS.iter().find(|w| {
                    out.ends_with(*w)
                        && !out[..out.len() - w.len()]
                            .ends_with(|p: char| p.is_alphanumeric() || p == '_')
                });
                match wrapper {
                    Some(w) => {
                        out.truncate(out.len() - w.len());
                        dropped.push(true);
                    }
                    None => {
                        out.push(c);
                        dropped.push(false);
                    }
                }
            }
            ')' => {
                if !dropped.pop().unwrap_or(false) {
                    out.push(c);
                }
            }
            '"' => {}
            _ => out.push(c),
        }
    }

    let mut value = out.trim();
    if let Some(open) = value.find(" { ") {
        let name = &value[..open];
        if value.len() >= open + 5
            && value.ends_with(" }")
            && name.chars().all(char::is_alphanumeric)
        {
            value = &value[open + 3..value.len() - 2];
        }
    }
    match value {
        "" | "None" | "Unknown" | "[]" => None,
        v => Some(v.to_string()),
    }
}

impl fmt::Display for DecodedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "station: {}", self.station)?;
        let kind = match self.report_type {
            ReportType::Routine => "routine report",
            ReportType::Special => "special report",
        };
        match self.modifier {
            Some(Modifier::Automatic) => writeln!(f, "type: {kind} (automatic)")?,
            Some(Modifier::Corrected) => writeln!(f, "type: {kind} (corrected)")?,
            None => writeln!(f, "type: {kind}")?,
        }
        writeln!(f, "time: {}", self.time.format("%Y-%m-%d %H:%M UTC"))?;
        for (label, value) in &self.fields {
            writeln!(f, "{label}: {value}")?;
        }
        match self.trend.as_deref() {
            Some("NOSIG") => writeln!(f, "trend: no significant change")?,
            Some(other) => writeln!(f, "trend: {other}")?,
            None => {}
        }
        write!(f, "METAR: {}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn may_20() -> DateTime<Utc> {
        at(2024, 5, 20, 12)
    }

    #[test]
    fn decodes_report_body() {
        let r = decode(
            "EGHI 282120Z 19015KT 140V220 6000 RA SCT006 BKN009 16/14 Q1006",
            may_20(),
        )
        .unwrap();
        assert_eq!(r.station, "EGHI");
        assert_eq!(r.report_type, ReportType::Routine);
        assert_eq!(r.time.to_rfc3339(), "2024-04-28T21:20:00+00:00");
        let labels: Vec<&str> = r.fields.iter().map(|(l, _)| *l).collect();
        for label in ["wind", "visibility", "sky", "temperature", "pressure"] {
            assert!(labels.contains(&label), "missing {label} in {labels:?}");
        }

        let text = r.to_string();
        assert!(text.starts_with("station: EGHI\ntype: routine report\n"));
        assert!(text.contains("time: 2024-04-28 21:20 UTC"));
        assert!(text.contains("temperature: 16"));
        assert!(text.ends_with(
            "METAR: EGHI 282120Z 19015KT 140V220 6000 RA SCT006 BKN009 16/14 Q1006"
        ));
    }

    #[rstest]
    #[case::icao_correction("METAR COR EGLL 200950Z 24008KT 9999 SCT032 12/05 Q1013", Some(Modifier::Corrected))]
    #[case::icao_automatic("METAR AUTO EGLL 200950Z 24008KT 9999 SCT032 12/05 Q1013", Some(Modifier::Automatic))]
    #[case::us_automatic("METAR EGLL 200950Z AUTO 24008KT 9999 SCT032 12/05 Q1013", Some(Modifier::Automatic))]
    #[case::plain("EGLL 200950Z 24008KT 9999 SCT032 12/05 Q1013=", None)]
    fn accepts_modifiers_either_side_of_station(
        #[case] raw: &str,
        #[case] modifier: Option<Modifier>,
    ) {
        let r = decode(raw, may_20()).unwrap();
        assert_eq!(r.station, "EGLL");
        assert_eq!(r.modifier, modifier);
        assert_eq!(r.time.to_rfc3339(), "2024-05-20T09:50:00+00:00");
    }

    #[test]
    fn speci_and_trend_are_framed_outside_the_body() {
        let r = decode(
            "SPECI EGLL 200950Z 24008KT 9999 SCT032 12/05 Q1013 NOSIG",
            may_20(),
        )
        .unwrap();
        assert_eq!(r.report_type, ReportType::Special);
        assert_eq!(r.trend.as_deref(), Some("NOSIG"));
        let text = r.to_string();
        assert!(text.contains("type: special report"));
        assert!(text.contains("trend: no significant change"));
    }

    #[rstest]
    #[case::same_month(may_20(), "191451Z", "2024-05-19T14:51:00+00:00")]
    #[case::previous_month(may_20(), "302351Z", "2024-04-30T23:51:00+00:00")]
    #[case::year_boundary(at(2025, 1, 2, 6), "312351Z", "2024-12-31T23:51:00+00:00")]
    #[case::clock_behind(at(2024, 4, 30, 23), "010000Z", "2024-05-01T00:00:00+00:00")]
    fn observation_time_resolution(
        #[case] now: DateTime<Utc>,
        #[case] group: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(resolve_time(group, now).unwrap().to_rfc3339(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_station("191451Z 22012KT")]
    #[case::no_time("KJFK 22012KT 10SM")]
    #[case::bad_hour("KJFK 192551Z 22012KT")]
    #[case::bad_day("KJFK 311200Z 22012KT")]
    #[case::error_text("No METAR available")]
    fn rejects_undecodable(#[case] raw: &str) {
        let err = decode(raw, may_20()).unwrap_err();
        assert!(matches!(err, BriefError::Decode { .. }), "{err}");
    }

    #[test]
    fn nil_report_is_empty() {
        let err = decode("METAR KJFK 191451Z NIL=", may_20()).unwrap_err();
        assert!(matches!(
            err,
            BriefError::EmptyReport {
                kind: ReportKind::Metar,
                ..
            }
        ));
    }

    #[rstest]
    #[case("Known(16)", Some("16"))]
    #[case("Known(Hectopascals(1006))", Some("Hectopascals(1006)"))]
    #[case(
        "Wind { dir: Known(Heading(190)), speed: Known(Knots(15)), varying: Some((140, 220)), gusting: None }",
        Some("dir: Heading(190), speed: Knots(15), varying: (140, 220), gusting: None")
    )]
    #[case("Some(\"AO2 SLP132\")", Some("AO2 SLP132"))]
    #[case("[Scattered(Normal, Some(6))]", Some("[Scattered(Normal, 6)]"))]
    #[case("None", None)]
    #[case("Unknown", None)]
    #[case("[]", None)]
    fn tidies_debug_output(#[case] debug: &str, #[case] expected: Option<&str>) {
        assert_eq!(tidy(debug).as_deref(), expected);
    }
}
