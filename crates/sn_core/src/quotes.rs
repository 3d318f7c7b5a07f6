use async_trait::async_trait;
use crate::types::QuoteSnapshot;
use crate::Result;

#[async_trait]
pub trait QuoteSource: Send + Sync + std::fmt::Debug {
    /// Name of the quote provider
    fn name(&self) -> &str;

    /// Fetch the latest quote for an upper-cased ticker symbol
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot>;
}
