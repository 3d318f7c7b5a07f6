use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use sn_core::{ChatMessage, Error, FragmentStream, Result, TextGenerator};

use crate::sse::decode_stream;
use crate::Config;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

pub struct OpenAiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    connect_timeout: Duration,
}

impl OpenAiModel {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::ConfigurationMissing("OPENAI_API_KEY".to_string()))?;
        // connect only: the body streams for as long as the model writes
        let client = Client::builder().connect_timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model_name.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            connect_timeout: config.timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[async_trait]
impl TextGenerator for OpenAiModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn stream(&self, messages: &[ChatMessage]) -> Result<FragmentStream> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
        };

        tracing::debug!("Submitting {} messages to {}", messages.len(), self.completions_url());
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from(e).into_generation_failure())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GenerationFailed(format!(
                "{} answered {}: {}",
                self.name(),
                status,
                body.trim()
            )));
        }

        Ok(decode_stream(response.bytes_stream()))
    }
}
