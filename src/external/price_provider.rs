use async_trait::async_trait;
use bigdecimal::BigDecimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("bad quote: {0}")]
    BadQuote(String),
}

/// Source of the current market price used when a holding is bought.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn current_price(
        &self,
        symbol: &str,
        purchase_price: &BigDecimal,
    ) -> Result<BigDecimal, PriceProviderError>;
}
