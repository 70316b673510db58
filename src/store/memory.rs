use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Holding, Portfolio, PortfolioHistory};
use crate::ports::outbound::{HistoryPort, HoldingPort, PortfolioPort};

#[derive(Default)]
struct MemoryState {
    portfolios: HashMap<Uuid, Portfolio>,
    // Insertion order doubles as the load order.
    holdings: Vec<Holding>,
    history: Vec<PortfolioHistory>,
}

/// Process-local store. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioPort for MemoryStore {
    async fn load_portfolio(&self, portfolio_id: Uuid) -> Result<Option<Portfolio>, AppError> {
        let state = self.state.read();
        Ok(state.portfolios.get(&portfolio_id).map(|p| {
            let mut portfolio = p.clone();
            portfolio.holdings = state
                .holdings
                .iter()
                .filter(|h| h.portfolio_id == portfolio_id)
                .cloned()
                .collect();
            portfolio.history = Vec::new();
            portfolio
        }))
    }

    async fn save_portfolio(&self, portfolio: Portfolio) -> Result<Portfolio, AppError> {
        let mut stored = portfolio.clone();
        stored.holdings = Vec::new();
        stored.history = Vec::new();
        self.state.write().portfolios.insert(portfolio.id, stored);
        Ok(portfolio)
    }
}

#[async_trait]
impl HoldingPort for MemoryStore {
    async fn load_holdings(&self, portfolio_id: Uuid) -> Result<Vec<Holding>, AppError> {
        let state = self.state.read();
        Ok(state
            .holdings
            .iter()
            .filter(|h| h.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }

    async fn save_holding(&self, holding: Holding) -> Result<Holding, AppError> {
        let mut state = self.state.write();
        if !state.portfolios.contains_key(&holding.portfolio_id) {
            return Err(AppError::NotFound(format!("Portfolio {} not found", holding.portfolio_id)));
        }
        match state.holdings.iter().position(|h| h.id == holding.id) {
            Some(index) => state.holdings[index] = holding.clone(),
            None => state.holdings.push(holding.clone()),
        }
        Ok(holding)
    }

    async fn delete_holding(&self, holding_id: Uuid) -> Result<u64, AppError> {
        let mut state = self.state.write();
        let before = state.holdings.len();
        state.holdings.retain(|h| h.id != holding_id);
        Ok((before - state.holdings.len()) as u64)
    }
}

#[async_trait]
impl HistoryPort for MemoryStore {
    async fn load_history(&self, portfolio_id: Uuid) -> Result<Vec<PortfolioHistory>, AppError> {
        let state = self.state.read();
        let mut entries: Vec<PortfolioHistory> = state
            .history
            .iter()
            .filter(|e| e.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for same-day points.
        entries.sort_by_key(|e| e.date);
        Ok(entries)
    }

    async fn append_history(&self, entry: PortfolioHistory) -> Result<PortfolioHistory, AppError> {
        let mut state = self.state.write();
        if !state.portfolios.contains_key(&entry.portfolio_id) {
            return Err(AppError::NotFound(format!("Portfolio {} not found", entry.portfolio_id)));
        }
        state.history.push(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[tokio::test]
    async fn test_history_is_sorted_by_date() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store.save_portfolio(Portfolio::empty(id)).await.unwrap();

        for (d, v) in [(3, 300), (1, 100), (2, 200), (1, 150)] {
            store
                .append_history(PortfolioHistory::new(id, day(d), BigDecimal::from(v)))
                .await
                .unwrap();
        }

        let values: Vec<BigDecimal> = store
            .load_history(id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.value)
            .collect();
        let expected: Vec<BigDecimal> = [100, 150, 200, 300].into_iter().map(BigDecimal::from).collect();
        assert_eq!(values, expected);
    }

    #[tokio::test]
    async fn test_save_holding_requires_portfolio() {
        let store = MemoryStore::new();
        let holding = Holding {
            id: Uuid::new_v4(),
            portfolio_id: Uuid::new_v4(),
            name: "X Company".into(),
            symbol: "X".into(),
            quantity: 1,
            price: BigDecimal::from(1),
            purchase_price: BigDecimal::from(1),
            purchase_date: day(1),
            daily_change_value: BigDecimal::from(0),
            daily_change_percent: BigDecimal::from(0),
            total_change_value: BigDecimal::from(0),
            total_change_percent: BigDecimal::from(0),
            logo_url: None,
        };
        let result = store.save_holding(holding).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_holding_affects_nothing() {
        let store = MemoryStore::new();
        assert_eq!(store.delete_holding(Uuid::new_v4()).await.unwrap(), 0);
    }
}
