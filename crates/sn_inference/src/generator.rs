use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use sn_core::{ChatMessage, Error, Prompt, Result, TextGenerator};

/// Persona every request is sent with.
pub const SYSTEM_PROMPT: &str = "You are a financial analyst";

/// Follow-up instruction that keeps the model from echoing tickers, since the
/// placeholder is swapped for the real identity afterwards.
pub const SYMBOL_GUARD: &str = "Do not mention any trading symbol information";

/// Pause observed after every completed generation.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ArticleGenerator {
    model: Arc<dyn TextGenerator>,
    pause: Duration,
}

impl ArticleGenerator {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model, pause: DEFAULT_PAUSE }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn messages(prompt: &Prompt) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt.as_str()),
            ChatMessage::user(SYMBOL_GUARD),
        ]
    }

    /// Runs the prompt through the backend and concatenates the non-empty
    /// fragments in arrival order.
    pub async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let messages = Self::messages(prompt);
        tracing::debug!("Prompt for {}: {}", self.model.name(), prompt);

        let mut fragments = self
            .model
            .stream(&messages)
            .await
            .map_err(Error::into_generation_failure)?;

        let mut article = String::new();
        let mut received = 0usize;
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment.map_err(Error::into_generation_failure)?;
            if fragment.is_empty() {
                continue;
            }
            article.push_str(&fragment);
            received += 1;
        }
        if received == 0 {
            return Err(Error::GenerationFailed(format!(
                "{} returned no text",
                self.model.name()
            )));
        }
        tracing::info!(
            "{} produced {} fragments ({} chars)",
            self.model.name(),
            received,
            article.chars().count()
        );

        if !self.pause.is_zero() {
            tracing::debug!("Pausing {:?} before returning", self.pause);
            tokio::time::sleep(self.pause).await;
        }

        Ok(article)
    }
}
