use sn_core::{Error, Result};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const GETQUOTE_API_KEY: &str = "GETQUOTE_API_KEY";

/// Secrets read from the environment at startup.
#[derive(Clone, Default)]
pub struct Secrets {
    pub openai_api_key: Option<String>,
    pub getquote_api_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("Secrets")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("getquote_api_key", &redact(&self.getquote_api_key))
            .finish()
    }
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            openai_api_key: read(OPENAI_API_KEY),
            getquote_api_key: read(GETQUOTE_API_KEY),
        }
    }

    pub fn quote_key(&self) -> Result<String> {
        self.getquote_api_key
            .clone()
            .ok_or_else(|| Error::ConfigurationMissing(GETQUOTE_API_KEY.to_string()))
    }

    pub fn model_key(&self) -> Result<String> {
        self.openai_api_key
            .clone()
            .ok_or_else(|| Error::ConfigurationMissing(OPENAI_API_KEY.to_string()))
    }
}
