//! Persistence seams the portfolio service depends on.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Holding, Portfolio, PortfolioHistory};

#[async_trait]
pub trait PortfolioPort: Send + Sync {
    /// Loads a portfolio with its holdings attached. History is left empty.
    async fn load_portfolio(&self, portfolio_id: Uuid) -> Result<Option<Portfolio>, AppError>;

    /// Inserts or updates the summary fields of a portfolio.
    async fn save_portfolio(&self, portfolio: Portfolio) -> Result<Portfolio, AppError>;
}

#[async_trait]
pub trait HoldingPort: Send + Sync {
    async fn load_holdings(&self, portfolio_id: Uuid) -> Result<Vec<Holding>, AppError>;

    async fn save_holding(&self, holding: Holding) -> Result<Holding, AppError>;

    async fn delete_holding(&self, holding_id: Uuid) -> Result<u64, AppError>;
}

#[async_trait]
pub trait HistoryPort: Send + Sync {
    /// Full series for a portfolio, oldest first.
    async fn load_history(&self, portfolio_id: Uuid) -> Result<Vec<PortfolioHistory>, AppError>;

    async fn append_history(&self, entry: PortfolioHistory) -> Result<PortfolioHistory, AppError>;
}

/// Everything the service needs from a backing store.
pub trait PortfolioStore: PortfolioPort + HoldingPort + HistoryPort {}

impl<T> PortfolioStore for T where T: PortfolioPort + HoldingPort + HistoryPort {}
