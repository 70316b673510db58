//! Use cases the web layer drives.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AddStock, Holding, Portfolio, PortfolioHistory};

#[async_trait]
pub trait GetPortfolioUseCase: Send + Sync {
    /// Returns the portfolio, provisioning an empty one on first use.
    async fn get_portfolio(&self) -> Result<Portfolio, AppError>;
}

#[async_trait]
pub trait GetHoldingsUseCase: Send + Sync {
    async fn get_holdings(&self, portfolio_id: Uuid) -> Result<Vec<Holding>, AppError>;
}

#[async_trait]
pub trait GetPortfolioHistoryUseCase: Send + Sync {
    /// `range` is accepted for API compatibility; the full series is returned.
    async fn get_portfolio_history(
        &self,
        portfolio_id: Uuid,
        range: &str,
    ) -> Result<Vec<PortfolioHistory>, AppError>;
}

#[async_trait]
pub trait AddStockUseCase: Send + Sync {
    async fn add_stock(&self, command: AddStock) -> Result<Holding, AppError>;
}

#[async_trait]
pub trait SellStockUseCase: Send + Sync {
    /// Removes the first holding of `symbol`. Missing symbols are ignored.
    async fn sell_stock(
        &self,
        portfolio_id: Uuid,
        symbol: &str,
        quantity: i32,
    ) -> Result<(), AppError>;
}
