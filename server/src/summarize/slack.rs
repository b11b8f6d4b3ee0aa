use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::Notifier;
use crate::upstream::{check_status, UpstreamError};

/// Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    url: String,
    client: Client,
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
}

impl SlackWebhook {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    async fn notify(&self, text: &str) -> Result<(), UpstreamError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookMessage { text })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
