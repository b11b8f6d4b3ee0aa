//! "Summarize my todos": read pending todos, ask a text-generation service
//! for a paragraph, post it to the chat webhook, hand it back to the caller.

mod gemini;
mod slack;

pub use gemini::{GeminiClient, DEFAULT_API_URL, DEFAULT_MODEL};
pub use slack::SlackWebhook;

use async_trait::async_trait;
use tracing::info;

use crate::error::AppError;
use crate::model::Todo;
use crate::store::TodoStore;
use crate::upstream::UpstreamError;

pub const NO_SUMMARY: &str = "No summary generated.";

const INSTRUCTION: &str = "Write a single paragraph, without bullet points, that summarizes \
the following pending todos. Mention the most urgent items first, considering priority and \
due date.";

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// First text candidate for `prompt`, or `None` when the service produced none.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, UpstreamError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), UpstreamError>;
}

/// Stand-in used when a service has no credentials configured; every call
/// fails with `NotConfigured`.
pub struct Unconfigured(pub &'static str);

#[async_trait]
impl TextGenerator for Unconfigured {
    async fn generate(&self, _prompt: &str) -> Result<Option<String>, UpstreamError> {
        Err(UpstreamError::NotConfigured(self.0))
    }
}

#[async_trait]
impl Notifier for Unconfigured {
    async fn notify(&self, _text: &str) -> Result<(), UpstreamError> {
        Err(UpstreamError::NotConfigured(self.0))
    }
}

/// One bullet per todo, annotated with priority and due date.
pub fn build_prompt<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> String {
    let lines: Vec<String> = todos
        .into_iter()
        .map(|todo| {
            let priority = todo.priority.map(|p| p.as_str()).unwrap_or("N/A");
            let due = todo
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            format!("- {} (Priority: {priority}, Due: {due})", todo.text)
        })
        .collect();
    let list = if lines.is_empty() {
        "- (no pending todos)".to_string()
    } else {
        lines.join("\n")
    };
    format!("{INSTRUCTION}\n\nSummarize these todos:\n{list}")
}

pub fn notification_text(summary: &str) -> String {
    format!("📝 Todo Summary:\n{summary}")
}

/// Run the whole chain once. Any failing step aborts with its own error.
pub async fn summarize(
    store: &dyn TodoStore,
    generator: &dyn TextGenerator,
    notifier: &dyn Notifier,
) -> Result<String, AppError> {
    let todos = store.list().await?;
    let pending: Vec<&Todo> = todos.iter().filter(|t| !t.completed).collect();
    let prompt = build_prompt(pending.iter().copied());

    let summary = generator
        .generate(&prompt)
        .await
        .map_err(AppError::Generation)?
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| NO_SUMMARY.to_string());

    notifier
        .notify(&notification_text(&summary))
        .await
        .map_err(AppError::Notification)?;

    info!(pending = pending.len(), "summary posted");
    Ok(summary)
}
