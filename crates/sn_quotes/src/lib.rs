use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sn_core::{Error, QuoteSnapshot, QuoteSource, Result};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.cloudquote.io";

#[derive(Clone)]
pub struct CloudQuoteConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl CloudQuoteConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for CloudQuoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudQuoteConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    rows: Vec<QuoteSnapshot>,
}

pub struct CloudQuoteSource {
    client: Client,
    config: CloudQuoteConfig,
}

impl fmt::Debug for CloudQuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudQuoteSource")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

impl CloudQuoteSource {
    pub fn new(config: CloudQuoteConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::ConfigurationMissing("GETQUOTE_API_KEY".to_string()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn quote_url(&self, symbol: &str) -> Result<Url> {
        let base = Url::parse(&self.config.base_url)
            .map_err(|e| Error::QuoteUnavailable(format!("Invalid quote service URL: {}", e)))?;
        let mut url = base
            .join("fcon/getQuote.json")
            .map_err(|e| Error::QuoteUnavailable(format!("Invalid quote service URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("symbol", symbol)
            .append_pair("T", &self.config.api_key);
        Ok(url)
    }
}

/// Pulls the first row out of a `getQuote.json` body.
pub fn parse_quote_body(symbol: &str, body: &str) -> Result<QuoteSnapshot> {
    let response: QuoteResponse = serde_json::from_str(body)
        .map_err(|e| Error::QuoteUnavailable(format!("Malformed quote for {}: {}", symbol, e)))?;
    response
        .rows
        .into_iter()
        .next()
        .ok_or_else(|| Error::QuoteUnavailable(format!("No quote data returned for {}", symbol)))
}

#[async_trait]
impl QuoteSource for CloudQuoteSource {
    fn name(&self) -> &str {
        "CloudQuote"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot> {
        let url = self.quote_url(symbol)?;
        tracing::debug!(
            "Fetching quote for {} from {}{}",
            symbol,
            url.origin().ascii_serialization(),
            url.path()
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::from(e).into_quote_failure())?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::QuoteUnavailable(format!(
                "Quote service answered {} for {}",
                status, symbol
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::from(e).into_quote_failure())?;
        parse_quote_body(symbol, &body)
    }
}

/// Fixed set of quotes served from memory.
#[derive(Debug, Default, Clone)]
pub struct StaticQuoteSource {
    quotes: HashMap<String, QuoteSnapshot>,
}

impl StaticQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, symbol: &str, snapshot: QuoteSnapshot) -> Self {
        self.quotes.insert(symbol.to_uppercase(), snapshot);
        self
    }
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    fn name(&self) -> &str {
        "Static"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot> {
        self.quotes
            .get(&symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| Error::QuoteUnavailable(format!("No quote data returned for {}", symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_requires_api_key() {
        let result = CloudQuoteSource::new(CloudQuoteConfig::new(""));
        assert!(matches!(result, Err(Error::ConfigurationMissing(_))));

        let result = CloudQuoteSource::new(CloudQuoteConfig::new("secret"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_quote_url_carries_symbol_and_token() {
        let source = CloudQuoteSource::new(
            CloudQuoteConfig::new("secret").with_base_url("http://localhost:9000/"),
        )
        .unwrap();
        let url = source.quote_url("BRK.B").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/fcon/getQuote.json?symbol=BRK.B&T=secret"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let source = CloudQuoteSource::new(CloudQuoteConfig::new("top-secret")).unwrap();
        let printed = format!("{:?}", source);
        assert!(!printed.contains("top-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_parse_quote_body_takes_first_row() {
        let body = r#"{"rows":[{"Name":"Acme Corp","Symbol":"ACME","Price":10.0},{"Name":"Other"}]}"#;
        let snapshot = parse_quote_body("ACME", body).unwrap();
        assert_eq!(snapshot.name.as_deref(), Some("Acme Corp"));
        assert_eq!(snapshot.price, Some(10.0));
        assert_eq!(snapshot.open, None);
    }

    #[test]
    fn test_parse_quote_body_rejects_empty_and_garbage() {
        let err = parse_quote_body("NOPE", r#"{"rows":[]}"#).unwrap_err();
        assert!(matches!(err, Error::QuoteUnavailable(_)));
        assert!(err.to_string().contains("NOPE"));

        let err = parse_quote_body("NOPE", r#"{}"#).unwrap_err();
        assert!(matches!(err, Error::QuoteUnavailable(_)));

        let err = parse_quote_body("NOPE", "<html>502</html>").unwrap_err();
        assert!(matches!(err, Error::QuoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_static_source_is_case_insensitive() {
        let source = StaticQuoteSource::new().with_quote(
            "acme",
            QuoteSnapshot { name: Some("Acme Corp".to_string()), ..Default::default() },
        );
        assert!(source.fetch_quote("ACME").await.is_ok());
        assert!(matches!(
            source.fetch_quote("MISSING").await,
            Err(Error::QuoteUnavailable(_))
        ));
    }
}
