use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::db;
use crate::db::holding_queries::HoldingRow;
use crate::db::portfolio_history_queries::PortfolioHistoryRow;
use crate::db::portfolio_queries::PortfolioRow;
use crate::errors::AppError;
use crate::models::{Holding, Portfolio, PortfolioHistory};
use crate::ports::outbound::{HistoryPort, HoldingPort, PortfolioPort};

/// Outbound ports backed by PostgreSQL.
#[derive(Clone)]
pub struct PgPortfolioStore {
    pool: PgPool,
}

impl PgPortfolioStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioPort for PgPortfolioStore {
    async fn load_portfolio(&self, portfolio_id: Uuid) -> Result<Option<Portfolio>, AppError> {
        let Some(row) = db::portfolio_queries::fetch_one(&self.pool, portfolio_id).await? else {
            return Ok(None);
        };
        let holdings = db::holding_queries::fetch_all(&self.pool, portfolio_id).await?;

        let mut portfolio = Portfolio::from(row);
        portfolio.holdings = holdings.into_iter().map(Holding::from).collect();
        Ok(Some(portfolio))
    }

    async fn save_portfolio(&self, portfolio: Portfolio) -> Result<Portfolio, AppError> {
        let holdings = portfolio.holdings.clone();
        let history = portfolio.history.clone();
        let row = db::portfolio_queries::upsert(&self.pool, PortfolioRow::from(portfolio))
            .await
            .map_err(|e| {
                error!("Failed to save portfolio: {}", e);
                e
            })?;

        let mut saved = Portfolio::from(row);
        saved.holdings = holdings;
        saved.history = history;
        Ok(saved)
    }
}

#[async_trait]
impl HoldingPort for PgPortfolioStore {
    async fn load_holdings(&self, portfolio_id: Uuid) -> Result<Vec<Holding>, AppError> {
        let rows = db::holding_queries::fetch_all(&self.pool, portfolio_id).await?;
        Ok(rows.into_iter().map(Holding::from).collect())
    }

    async fn save_holding(&self, holding: Holding) -> Result<Holding, AppError> {
        let portfolio_id = holding.portfolio_id;
        match db::holding_queries::upsert(&self.pool, HoldingRow::from(holding)).await {
            Ok(row) => Ok(Holding::from(row)),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(AppError::NotFound(format!("Portfolio {} not found", portfolio_id)))
            }
            Err(e) => {
                error!("Failed to save holding for portfolio {}: {:?}", portfolio_id, e);
                Err(AppError::Db(e))
            }
        }
    }

    async fn delete_holding(&self, holding_id: Uuid) -> Result<u64, AppError> {
        Ok(db::holding_queries::delete(&self.pool, holding_id).await?)
    }
}

#[async_trait]
impl HistoryPort for PgPortfolioStore {
    async fn load_history(&self, portfolio_id: Uuid) -> Result<Vec<PortfolioHistory>, AppError> {
        let rows = db::portfolio_history_queries::fetch_all(&self.pool, portfolio_id).await?;
        Ok(rows.into_iter().map(PortfolioHistory::from).collect())
    }

    async fn append_history(&self, entry: PortfolioHistory) -> Result<PortfolioHistory, AppError> {
        let row = db::portfolio_history_queries::insert(&self.pool, PortfolioHistoryRow::from(entry)).await?;
        Ok(PortfolioHistory::from(row))
    }
}

fn or_zero(value: Option<BigDecimal>) -> BigDecimal {
    value.unwrap_or_else(|| BigDecimal::from(0))
}

impl From<PortfolioRow> for Portfolio {
    fn from(row: PortfolioRow) -> Self {
        Self {
            id: row.id,
            total_value: or_zero(row.total_value),
            daily_change_value: or_zero(row.daily_change_value),
            daily_change_percent: or_zero(row.daily_change_percent),
            total_change_value: or_zero(row.total_change_value),
            total_change_percent: or_zero(row.total_change_percent),
            holdings: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl From<Portfolio> for PortfolioRow {
    fn from(portfolio: Portfolio) -> Self {
        Self {
            id: portfolio.id,
            total_value: Some(portfolio.total_value),
            daily_change_value: Some(portfolio.daily_change_value),
            daily_change_percent: Some(portfolio.daily_change_percent),
            total_change_value: Some(portfolio.total_change_value),
            total_change_percent: Some(portfolio.total_change_percent),
        }
    }
}

impl From<HoldingRow> for Holding {
    fn from(row: HoldingRow) -> Self {
        Self {
            id: row.id,
            portfolio_id: row.portfolio_id,
            name: row.name.unwrap_or_else(|| row.symbol.clone()),
            symbol: row.symbol,
            quantity: row.quantity.unwrap_or(0),
            price: or_zero(row.price),
            purchase_price: or_zero(row.purchase_price),
            purchase_date: row.purchase_date,
            daily_change_value: or_zero(row.daily_change_value),
            daily_change_percent: or_zero(row.daily_change_percent),
            total_change_value: or_zero(row.total_change_value),
            total_change_percent: or_zero(row.total_change_percent),
            logo_url: row.logo_url,
        }
    }
}

impl From<Holding> for HoldingRow {
    fn from(holding: Holding) -> Self {
        Self {
            id: holding.id,
            portfolio_id: holding.portfolio_id,
            name: Some(holding.name),
            symbol: holding.symbol,
            quantity: Some(holding.quantity),
            price: Some(holding.price),
            purchase_price: Some(holding.purchase_price),
            purchase_date: holding.purchase_date,
            daily_change_value: Some(holding.daily_change_value),
            daily_change_percent: Some(holding.daily_change_percent),
            total_change_value: Some(holding.total_change_value),
            total_change_percent: Some(holding.total_change_percent),
            logo_url: holding.logo_url,
        }
    }
}

impl From<PortfolioHistoryRow> for PortfolioHistory {
    fn from(row: PortfolioHistoryRow) -> Self {
        Self {
            id: row.id,
            portfolio_id: row.portfolio_id,
            date: row.date,
            value: or_zero(row.value),
        }
    }
}

impl From<PortfolioHistory> for PortfolioHistoryRow {
    fn from(entry: PortfolioHistory) -> Self {
        Self {
            id: entry.id,
            portfolio_id: entry.portfolio_id,
            date: entry.date,
            value: Some(entry.value),
        }
    }
}
