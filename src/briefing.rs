//! Briefing assembly and rendering, both for the terminal and for Slack.

use serde::Serialize;

use crate::icao::AirportCode;

const ATTACHMENT_COLOR: &str = "#36a64f";
const FOOTER: &str = "Weather data provided by AviationWeather.gov";
const FOOTER_ICON: &str = "https://www.aviationweather.gov/sites/default/files/favicon.ico";
const THUMB_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/6/67/Weather_icon_001.svg/120px-Weather_icon_001.svg.png";

/// Everything that goes out for one airport.
#[derive(Clone, Debug, PartialEq)]
pub struct Briefing {
    pub code: AirportCode,
    pub metar: String,
    pub taf: String,
    pub decoded_metar: String,
}

/// Slack incoming-webhook message.
#[derive(Serialize, Debug, PartialEq)]
pub struct SlackPayload {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Attachment {
    pub color: String,
    pub title: String,
    pub pretext: String,
    pub fields: Vec<Field>,
    pub footer: String,
    pub footer_icon: String,
    pub thumb_url: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl Field {
    fn long(title: &str, value: &str) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
            short: false,
        }
    }
}

impl Briefing {
    pub fn new(code: AirportCode, metar: String, taf: String, decoded_metar: String) -> Self {
        Self {
            code,
            metar,
            taf,
            decoded_metar,
        }
    }

    /// Plain text version printed to stdout.
    pub fn render_text(&self) -> String {
        format!(
            "*Weather Brief for {}*\n\n*METAR:*\n{}\n\n*TAF:*\n{}\n\n*Decoded METAR:*\n{}\n",
            self.code, self.metar, self.taf, self.decoded_metar
        )
    }

    /// Message body for the webhook: a Markdown summary plus one attachment
    /// carrying the same three sections as fields.
    pub fn to_payload(&self) -> SlackPayload {
        let text = format!(
            "*Weather Brief for {}* :airplane: \n\n*METAR* :bar_chart: \n{}\n\n*TAF* :cloud_with_rain: \n{}\n\n*Decoded METAR* :book: \n{}",
            self.code, self.metar, self.taf, self.decoded_metar
        );
        SlackPayload {
            text,
            attachments: vec![Attachment {
                color: ATTACHMENT_COLOR.to_string(),
                title: "Weather Information".to_string(),
                pretext: format!("Weather Brief for *{}*", self.code),
                fields: vec![
                    Field::long("METAR", &self.metar),
                    Field::long("TAF", &self.taf),
                    Field::long("Decoded METAR", &self.decoded_metar),
                ],
                footer: FOOTER.to_string(),
                footer_icon: FOOTER_ICON.to_string(),
                thumb_url: THUMB_URL.to_string(),
            }],
        }
    }
}
