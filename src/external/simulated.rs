use async_trait::async_trait;
use bigdecimal::{BigDecimal, FromPrimitive};
use rand::Rng;
use tracing::debug;

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::round_half_up;

/// Placeholder quote source: perturbs the purchase price by a random
/// percentage in `[-jitter_percent, +jitter_percent]`.
#[derive(Debug, Clone)]
pub struct SimulatedPriceProvider {
    jitter_percent: f64,
}

impl SimulatedPriceProvider {
    pub fn new(jitter_percent: f64) -> Self {
        Self {
            jitter_percent: jitter_percent.abs(),
        }
    }
}

#[async_trait]
impl PriceProvider for SimulatedPriceProvider {
    async fn current_price(
        &self,
        symbol: &str,
        purchase_price: &BigDecimal,
    ) -> Result<BigDecimal, PriceProviderError> {
        if self.jitter_percent == 0.0 {
            return Ok(purchase_price.clone());
        }

        let jitter = self.jitter_percent;
        let offset = rand::rng().random_range(-jitter..=jitter);
        let factor = BigDecimal::from_f64(1.0 + offset / 100.0)
            .ok_or_else(|| PriceProviderError::BadQuote(format!("non-finite factor for {}", symbol)))?;

        let price = round_half_up(&(purchase_price * factor), 2);
        debug!("Simulated price for {}: {} (purchase {})", symbol, price, purchase_price);
        Ok(price)
    }
}

/// Always quotes the same price, or echoes the purchase price when unset.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct FixedPriceProvider {
    pub price: Option<BigDecimal>,
}

#[cfg(test)]
#[async_trait]
impl PriceProvider for FixedPriceProvider {
    async fn current_price(
        &self,
        _symbol: &str,
        purchase_price: &BigDecimal,
    ) -> Result<BigDecimal, PriceProviderError> {
        Ok(self.price.clone().unwrap_or_else(|| purchase_price.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[tokio::test]
    async fn test_zero_jitter_returns_purchase_price() {
        let provider = SimulatedPriceProvider::new(0.0);
        let purchase = BigDecimal::from_str("150.00").unwrap();
        let price = provider.current_price("AAPL", &purchase).await.unwrap();
        assert_eq!(price, purchase);
    }

    #[tokio::test]
    async fn test_price_stays_within_jitter_band() {
        let provider = SimulatedPriceProvider::new(10.0);
        let purchase = BigDecimal::from(100);
        let low = BigDecimal::from(90);
        let high = BigDecimal::from(110);

        for _ in 0..200 {
            let price = provider.current_price("AAPL", &purchase).await.unwrap();
            assert!(price >= low && price <= high, "price {} out of band", price);
        }
    }
}
