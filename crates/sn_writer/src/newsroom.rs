use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sn_core::{
    Article, Error, PeriodLabel, Prompt, Quote, QuoteSnapshot, QuoteSource, Result, NOT_AVAILABLE,
};
use sn_inference::ArticleGenerator;

use crate::period;
use crate::prompt::PromptBuilder;
use crate::substitute::TextSubstitutor;

/// Everything produced for one article request.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub quote: Quote,
    pub period: PeriodLabel,
    pub prompt: Option<Prompt>,
    pub article: Option<Article>,
}

/// Fetch, classify, prompt, generate and finalize, one request at a time.
#[derive(Debug, Clone)]
pub struct Newsroom {
    quotes: Arc<dyn QuoteSource>,
    generator: ArticleGenerator,
    prompts: PromptBuilder,
}

impl Newsroom {
    pub fn new(quotes: Arc<dyn QuoteSource>, generator: ArticleGenerator) -> Self {
        Self {
            quotes,
            generator,
            prompts: PromptBuilder::new(),
        }
    }

    pub async fn fetch(&self, symbol: &str) -> Result<QuoteSnapshot> {
        fetch_snapshot(self.quotes.as_ref(), symbol).await
    }

    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        fetch_quote(self.quotes.as_ref(), symbol).await
    }

    /// Builds the prompt without calling the model. `period` overrides the
    /// label derived from `now`.
    pub async fn draft(
        &self,
        symbol: &str,
        period: Option<PeriodLabel>,
        now: DateTime<Utc>,
    ) -> Result<Report> {
        let quote = self.quote(symbol).await?;
        let period = period.unwrap_or_else(|| period::classify_instant(&now));
        tracing::info!("🕒 {} is in the {} window", quote.symbol, period);

        let prompt = self.prompts.build(&quote, period)?;
        Ok(Report {
            quote,
            period,
            prompt,
            article: None,
        })
    }

    pub async fn write(
        &self,
        symbol: &str,
        period: Option<PeriodLabel>,
        now: DateTime<Utc>,
    ) -> Result<Report> {
        let mut report = self.draft(symbol, period, now).await?;
        let Some(prompt) = &report.prompt else {
            tracing::info!("🌙 Market closed, skipping article for {}", report.quote.symbol);
            return Ok(report);
        };

        tracing::info!(
            "🧠 Generating {} article for {} with {}",
            report.period,
            report.quote.symbol,
            self.generator.model_name()
        );
        let raw = self.generator.generate(prompt).await?;

        let quote = &report.quote;
        let substitutor = TextSubstitutor::new(&quote.name, &quote.exchange, &quote.symbol);
        report.article = Some(Article {
            content: substitutor.finalize(&raw),
            company: quote.name.clone(),
            exchange: quote.exchange.clone(),
            symbol: quote.symbol.clone(),
            period: report.period,
        });
        Ok(report)
    }
}

pub async fn fetch_snapshot(quotes: &dyn QuoteSource, symbol: &str) -> Result<QuoteSnapshot> {
    let symbol = normalize_symbol(symbol)?;
    tracing::info!("📈 Fetching {} from {}", symbol, quotes.name());
    quotes
        .fetch_quote(&symbol)
        .await
        .map_err(Error::into_quote_failure)
}

/// Fetch and resolve. A quote without a symbol keeps the requested one.
pub async fn fetch_quote(quotes: &dyn QuoteSource, symbol: &str) -> Result<Quote> {
    let snapshot = fetch_snapshot(quotes, symbol).await?;
    let mut quote = snapshot.resolve();
    if quote.symbol == NOT_AVAILABLE {
        quote.symbol = normalize_symbol(symbol)?;
    }
    Ok(quote)
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(Error::QuoteUnavailable("no stock symbol given".to_string()));
    }
    Ok(symbol)
}
