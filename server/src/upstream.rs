//! Shared plumbing for the HTTP services this server calls: the store's REST
//! endpoint, the generation API and the notification webhook.

use reqwest::Response;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status. `message` is the upstream's own explanation.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Pass successful responses through; turn anything else into `Status`.
pub async fn check_status(response: Response) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Pull a human-readable message out of an upstream error body.
///
/// PostgREST answers `{"message": ..}`, Google APIs `{"error": {"message": ..}}`,
/// Slack a bare token such as `no_service`.
pub fn error_message(body: &str) -> String {
    let body = body.trim();
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let candidates = [
            json.get("message"),
            json.get("error").and_then(|e| e.get("message")),
            json.get("error"),
            json.get("msg"),
        ];
        if let Some(message) = candidates.into_iter().flatten().find_map(Value::as_str) {
            return message.to_string();
        }
    }
    body.to_string()
}
