use std::sync::Arc;

use sn_core::{Error, Result, TextGenerator};

use crate::Config;

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

pub const AVAILABLE_MODELS: [&str; 2] = ["openai", "dummy"];

/// Build the text-generation backend named in `config.backend`.
pub fn create_model(config: &Config) -> Result<Arc<dyn TextGenerator>> {
    let model: Arc<dyn TextGenerator> = match config.backend.to_lowercase().as_str() {
        "openai" => Arc::new(OpenAiModel::new(config)?),
        "dummy" => Arc::new(DummyModel::default()),
        other => {
            return Err(Error::ConfigurationMissing(format!(
                "unknown model backend '{}', expected one of: {}",
                other,
                AVAILABLE_MODELS.join(", ")
            )))
        }
    };
    tracing::debug!("Using {} text generation backend", model.name());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model_by_name() {
        let config = Config { backend: "dummy".to_string(), ..Config::default() };
        assert_eq!(create_model(&config).unwrap().name(), "Dummy");

        let config = Config {
            backend: "OpenAI".to_string(),
            api_key: Some("test-key".to_string()),
            ..Config::default()
        };
        assert_eq!(create_model(&config).unwrap().name(), "OpenAI");
    }

    #[test]
    fn test_create_model_errors() {
        let config = Config { backend: "openai".to_string(), ..Config::default() };
        let err = create_model(&config).unwrap_err();
        assert_eq!(err.to_string(), "Missing configuration: OPENAI_API_KEY");

        let config = Config { backend: "ollama".to_string(), ..Config::default() };
        assert!(create_model(&config).unwrap_err().to_string().contains("ollama"));
    }
}
