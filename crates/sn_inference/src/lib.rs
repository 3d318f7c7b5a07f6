use std::time::Duration;

pub mod generator;
pub mod models;
pub mod sse;

#[derive(Clone)]
pub struct Config {
    /// Backend selector, see [`models::AVAILABLE_MODELS`]
    pub backend: String,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("backend", &self.backend)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            api_key: None,
            model_name: None,
            base_url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

pub mod prelude {
    pub use super::generator::ArticleGenerator;
    pub use super::models::create_model;
    pub use super::Config;
    pub use sn_core::{Error, Prompt, Result, TextGenerator};
}

pub use generator::ArticleGenerator;
pub use models::create_model;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_key() {
        let config = Config { api_key: Some("sk-live".to_string()), ..Config::default() };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-live"));
        assert!(printed.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_inference_pipeline() {
        let config = Config { backend: "dummy".to_string(), ..Config::default() };
        let generator = ArticleGenerator::new(create_model(&config).unwrap())
            .with_pause(Duration::ZERO);
        let text = generator.generate(&sn_core::Prompt::new("write")).await.unwrap();
        assert!(!text.is_empty());
    }
}
