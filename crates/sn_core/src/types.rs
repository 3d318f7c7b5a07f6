use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Literal used wherever a string field is missing from the feed.
pub const NOT_AVAILABLE: &str = "N/A";

/// A point-in-time quote as delivered by the quote source. Every field may be
/// missing; call [`QuoteSnapshot::resolve`] before doing arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuoteSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub exchange_short_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub prev_close: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub after_hours_price: Option<f64>,
    #[serde(default)]
    pub volume: Option<u64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub after_hours_trade_time: Option<i64>,
}

impl QuoteSnapshot {
    /// Applies the feed defaults once: numbers fall back to zero, strings to
    /// `"N/A"`, and the exchange is upper-cased.
    pub fn resolve(&self) -> Quote {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };

        Quote {
            name: text(&self.name),
            symbol: text(&self.symbol).to_uppercase(),
            exchange: text(&self.exchange_short_name).to_uppercase(),
            price: self.price.unwrap_or(0.0),
            prev_close: self.prev_close.unwrap_or(0.0),
            open: self.open.unwrap_or(0.0),
            after_hours_price: self.after_hours_price.unwrap_or(0.0),
            volume: self.volume.unwrap_or(0),
            change_percent: self.change_percent.unwrap_or(0.0),
            after_hours_trade_time: self
                .after_hours_trade_time
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        }
    }
}

/// A quote with every default already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub name: String,
    pub symbol: String,
    pub exchange: String,
    pub price: f64,
    pub prev_close: f64,
    pub open: f64,
    pub after_hours_price: f64,
    pub volume: u64,
    pub change_percent: f64,
    pub after_hours_trade_time: Option<DateTime<Utc>>,
}

/// Where in the US trading day an article is being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodLabel {
    #[serde(rename = "Mid-day")]
    MidDay,
    #[serde(rename = "Pre-market")]
    PreMarket,
    #[serde(rename = "Post-market")]
    PostMarket,
    #[serde(rename = "Market-Closed")]
    MarketClosed,
}

impl PeriodLabel {
    pub const ALL: [PeriodLabel; 4] = [
        PeriodLabel::MidDay,
        PeriodLabel::PreMarket,
        PeriodLabel::PostMarket,
        PeriodLabel::MarketClosed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodLabel::MidDay => "Mid-day",
            PeriodLabel::PreMarket => "Pre-market",
            PeriodLabel::PostMarket => "Post-market",
            PeriodLabel::MarketClosed => "Market-Closed",
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::InvalidPeriod(format!(
                    "'{}' is not one of Mid-day, Pre-market, Post-market, Market-Closed",
                    wanted
                ))
            })
    }
}

/// Instruction text handed to the text-generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub content: String,
    pub company: String,
    pub exchange: String,
    pub symbol: String,
    pub period: PeriodLabel,
}
