//! Briefing delivery to a Slack incoming webhook.

use tracing::{debug, info};

use crate::briefing::SlackPayload;
use crate::config::Settings;
use crate::error::BriefError;

#[derive(Clone, Debug)]
pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
}

impl WebhookClient {
    /// Fails with a configuration error when no webhook URL is set.
    pub fn new(settings: &Settings) -> Result<Self, BriefError> {
        let url = settings.require_webhook()?.to_string();
        Ok(Self {
            http: settings.http_client()?,
            url,
        })
    }

    /// POST `payload` as JSON. Any transport error or non-2xx status is a
    /// delivery failure.
    pub async fn send(&self, payload: &SlackPayload) -> Result<(), BriefError> {
        self.http
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| {
                // The webhook URL is a secret; keep it out of logs and messages.
                let source = source.without_url();
                debug!("sending to Slack failed: {source}");
                BriefError::Delivery { source }
            })?;
        info!("Data sent to Slack successfully.");
        Ok(())
    }
}
