use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::{normalize_symbol, round_half_up, AddStock, Holding, Portfolio, PortfolioHistory};
use crate::ports::inbound::{
    AddStockUseCase, GetHoldingsUseCase, GetPortfolioHistoryUseCase, GetPortfolioUseCase,
    SellStockUseCase,
};
use crate::ports::outbound::{HistoryPort, HoldingPort, PortfolioPort, PortfolioStore};

#[derive(Debug, Clone)]
pub struct PortfolioSettings {
    /// Every request operates on this single portfolio.
    pub portfolio_id: Uuid,
    /// Logo URL with a `{symbol}` placeholder.
    pub logo_url_template: String,
}

pub struct PortfolioService {
    store: Arc<dyn PortfolioStore>,
    price_provider: Arc<dyn PriceProvider>,
    settings: PortfolioSettings,
}

impl PortfolioService {
    pub fn new(
        store: Arc<dyn PortfolioStore>,
        price_provider: Arc<dyn PriceProvider>,
        settings: PortfolioSettings,
    ) -> Self {
        Self {
            store,
            price_provider,
            settings,
        }
    }

    pub fn portfolio_id(&self) -> Uuid {
        self.settings.portfolio_id
    }

    fn logo_url(&self, symbol: &str) -> String {
        self.settings.logo_url_template.replace("{symbol}", symbol)
    }

    async fn record_total(&self, portfolio: Portfolio, total_value: BigDecimal) -> Result<Portfolio, AppError> {
        let saved = self.store.save_portfolio(portfolio.with_total_value(total_value)).await?;
        let entry = PortfolioHistory::new(saved.id, Utc::now().date_naive(), saved.total_value.clone());
        self.store.append_history(entry).await?;
        Ok(saved)
    }
}

fn validate_add(command: &AddStock) -> Result<(), AppError> {
    if command.symbol.trim().is_empty() {
        return Err(AppError::Validation("Symbol cannot be empty".into()));
    }
    if command.quantity <= 0 {
        return Err(AppError::Validation("Quantity must be > 0".into()));
    }
    if command.purchase_price <= BigDecimal::from(0) {
        return Err(AppError::Validation("Purchase price must be > 0".into()));
    }
    Ok(())
}

#[async_trait]
impl GetPortfolioUseCase for PortfolioService {
    async fn get_portfolio(&self) -> Result<Portfolio, AppError> {
        let id = self.settings.portfolio_id;
        if let Some(portfolio) = self.store.load_portfolio(id).await? {
            return Ok(portfolio);
        }
        info!("Portfolio {} not found, provisioning an empty one", id);
        self.store.save_portfolio(Portfolio::empty(id)).await
    }
}

#[async_trait]
impl GetHoldingsUseCase for PortfolioService {
    async fn get_holdings(&self, portfolio_id: Uuid) -> Result<Vec<Holding>, AppError> {
        let holdings = self.store.load_holdings(portfolio_id).await?;
        Ok(holdings.into_iter().map(Holding::with_total_change).collect())
    }
}

#[async_trait]
impl GetPortfolioHistoryUseCase for PortfolioService {
    async fn get_portfolio_history(
        &self,
        portfolio_id: Uuid,
        range: &str,
    ) -> Result<Vec<PortfolioHistory>, AppError> {
        debug!("Loading history for {} (range {} ignored)", portfolio_id, range);
        self.store.load_history(portfolio_id).await
    }
}

#[async_trait]
impl AddStockUseCase for PortfolioService {
    async fn add_stock(&self, command: AddStock) -> Result<Holding, AppError> {
        // Float input from clients carries binary noise; money is kept to cents.
        let command = AddStock {
            purchase_price: round_half_up(&command.purchase_price, 2),
            ..command
        };
        validate_add(&command)?;
        let portfolio = self.get_portfolio().await?;

        let symbol = normalize_symbol(&command.symbol);
        let price = self
            .price_provider
            .current_price(&symbol, &command.purchase_price)
            .await?;

        let holding = Holding {
            id: Uuid::new_v4(),
            portfolio_id: portfolio.id,
            name: format!("{} Company", symbol),
            logo_url: Some(self.logo_url(&symbol)),
            quantity: command.quantity,
            price,
            purchase_price: command.purchase_price,
            purchase_date: command.purchase_date.unwrap_or_else(|| Utc::now().date_naive()),
            daily_change_value: BigDecimal::from(0),
            daily_change_percent: BigDecimal::from(0),
            total_change_value: BigDecimal::from(0),
            total_change_percent: BigDecimal::from(0),
            symbol,
        }
        .with_total_change();

        let saved = self.store.save_holding(holding).await?;
        let total_value = &portfolio.total_value + saved.market_value();
        let portfolio = self.record_total(portfolio, total_value).await?;

        info!(
            "Bought {} x {} at {} (portfolio total {})",
            saved.quantity, saved.symbol, saved.price, portfolio.total_value
        );
        Ok(saved)
    }
}

#[async_trait]
impl SellStockUseCase for PortfolioService {
    async fn sell_stock(
        &self,
        portfolio_id: Uuid,
        symbol: &str,
        quantity: i32,
    ) -> Result<(), AppError> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(AppError::Validation("Symbol cannot be empty".into()));
        }
        if quantity <= 0 {
            return Err(AppError::Validation("Quantity must be > 0".into()));
        }

        let holdings = self.store.load_holdings(portfolio_id).await?;
        let Some(holding) = holdings.into_iter().find(|h| h.symbol == symbol) else {
            debug!("No holding of {} in portfolio {}, nothing to sell", symbol, portfolio_id);
            return Ok(());
        };

        // Partial sales are not supported: the whole position goes.
        if self.store.delete_holding(holding.id).await? == 0 {
            return Ok(());
        }

        if let Some(portfolio) = self.store.load_portfolio(portfolio_id).await? {
            let total_value = &portfolio.total_value - holding.market_value();
            self.record_total(portfolio, total_value).await?;
        }

        info!(
            "Sold {} x {} (requested {})",
            holding.quantity, holding.symbol, quantity
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use super::*;
    use crate::external::simulated::FixedPriceProvider;
    use crate::store::MemoryStore;

    const PORTFOLIO_ID: &str = "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11";

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn service_with_price(price: Option<&str>) -> PortfolioService {
        PortfolioService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedPriceProvider { price: price.map(dec) }),
            PortfolioSettings {
                portfolio_id: Uuid::parse_str(PORTFOLIO_ID).unwrap(),
                logo_url_template: "https://logos.test/{symbol}.png".to_string(),
            },
        )
    }

    fn buy(symbol: &str, quantity: i32, purchase_price: &str) -> AddStock {
        AddStock {
            symbol: symbol.to_string(),
            quantity,
            purchase_price: dec(purchase_price),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 15),
        }
    }

    #[tokio::test]
    async fn test_get_portfolio_provisions_empty_portfolio() {
        let service = service_with_price(None);
        let portfolio = service.get_portfolio().await.unwrap();

        assert_eq!(portfolio.id, service.portfolio_id());
        assert_eq!(portfolio.total_value, BigDecimal::from(0));
        assert_eq!(portfolio.daily_change_value, BigDecimal::from(0));
        assert_eq!(portfolio.daily_change_percent, BigDecimal::from(0));
        assert_eq!(portfolio.total_change_value, BigDecimal::from(0));
        assert_eq!(portfolio.total_change_percent, BigDecimal::from(0));

        // Second call loads the persisted one instead of provisioning again.
        let again = service.get_portfolio().await.unwrap();
        assert_eq!(again.id, portfolio.id);
    }

    #[tokio::test]
    async fn test_add_stock_builds_holding_and_updates_total() {
        let service = service_with_price(Some("175.00"));
        let holding = service.add_stock(buy(" aapl ", 10, "150.00")).await.unwrap();

        assert_eq!(holding.symbol, "AAPL");
        assert_eq!(holding.name, "AAPL Company");
        assert_eq!(holding.logo_url.as_deref(), Some("https://logos.test/AAPL.png"));
        assert_eq!(holding.price, dec("175.00"));
        assert_eq!(holding.purchase_price, dec("150.00"));
        assert_eq!(holding.total_change_value, dec("250.00"));
        assert_eq!(holding.total_change_percent, dec("16.67"));
        assert_eq!(holding.daily_change_value, BigDecimal::from(0));

        let portfolio = service.get_portfolio().await.unwrap();
        assert_eq!(portfolio.total_value, dec("1750.00"));
        assert_eq!(portfolio.holdings.len(), 1);
    }

    #[tokio::test]
    async fn test_add_stock_rounds_purchase_price_to_cents() {
        let service = service_with_price(None);
        let holding = service.add_stock(buy("AAPL", 10, "150.1000000000000")).await.unwrap();
        assert_eq!(holding.purchase_price.to_string(), "150.10");
        assert_eq!(holding.price.to_string(), "150.10");

        let holding = service.add_stock(buy("MSFT", 1, "99.995")).await.unwrap();
        assert_eq!(holding.purchase_price, dec("100.00"));

        let portfolio = service.get_portfolio().await.unwrap();
        assert_eq!(portfolio.total_value, dec("1601.00"));
    }

    #[tokio::test]
    async fn test_add_stock_rejects_price_that_rounds_to_zero() {
        let service = service_with_price(None);
        let result = service.add_stock(buy("PENNY", 1, "0.004")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_stock_defaults_purchase_date_to_today() {
        let service = service_with_price(None);
        let mut command = buy("MSFT", 1, "300");
        command.purchase_date = None;
        let holding = service.add_stock(command).await.unwrap();
        assert_eq!(holding.purchase_date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_add_stock_rejects_invalid_input() {
        let service = service_with_price(None);
        for command in [buy("", 1, "10"), buy("AAPL", 0, "10"), buy("AAPL", -3, "10"), buy("AAPL", 1, "0")] {
            let result = service.add_stock(command).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
        assert!(service.get_holdings(service.portfolio_id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_holdings_recomputes_total_change() {
        let service = service_with_price(Some("2400.00"));
        service.add_stock(buy("GOOGL", 5, "2500.00")).await.unwrap();

        let holdings = service.get_holdings(service.portfolio_id()).await.unwrap();
        assert_eq!(holdings.len(), 1);
        let googl = &holdings[0];
        assert_eq!(googl.total_change_value, (&googl.price - &googl.purchase_price) * BigDecimal::from(googl.quantity));
        assert_eq!(googl.total_change_value, dec("-500.00"));
        assert_eq!(googl.total_change_percent, dec("-4.00"));
    }

    #[tokio::test]
    async fn test_sell_removes_whole_holding_regardless_of_quantity() {
        let service = service_with_price(Some("110.00"));
        let id = service.portfolio_id();
        service.add_stock(buy("AAPL", 10, "100.00")).await.unwrap();
        service.add_stock(buy("MSFT", 2, "100.00")).await.unwrap();

        service.sell_stock(id, "aapl", 1).await.unwrap();

        let holdings = service.get_holdings(id).await.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol, "MSFT");

        let portfolio = service.get_portfolio().await.unwrap();
        assert_eq!(portfolio.total_value, dec("220.00"));
    }

    #[tokio::test]
    async fn test_sell_only_removes_first_matching_holding() {
        let service = service_with_price(None);
        let id = service.portfolio_id();
        service.add_stock(buy("AAPL", 1, "100")).await.unwrap();
        service.add_stock(buy("AAPL", 2, "120")).await.unwrap();

        service.sell_stock(id, "AAPL", 1).await.unwrap();

        let holdings = service.get_holdings(id).await.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].quantity, 2);
        assert_eq!(service.get_portfolio().await.unwrap().total_value, BigDecimal::from(240));
    }

    #[tokio::test]
    async fn test_sell_unknown_symbol_is_noop() {
        let service = service_with_price(None);
        let id = service.portfolio_id();
        service.add_stock(buy("AAPL", 1, "100")).await.unwrap();
        let history_before = service.get_portfolio_history(id, "1M").await.unwrap().len();

        service.sell_stock(id, "TSLA", 5).await.unwrap();

        assert_eq!(service.get_holdings(id).await.unwrap().len(), 1);
        assert_eq!(service.get_portfolio().await.unwrap().total_value, BigDecimal::from(100));
        assert_eq!(service.get_portfolio_history(id, "1M").await.unwrap().len(), history_before);
    }

    #[tokio::test]
    async fn test_sell_on_empty_store_is_noop() {
        let service = service_with_price(None);
        service.sell_stock(service.portfolio_id(), "AAPL", 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_sell_rejects_invalid_input() {
        let service = service_with_price(None);
        let id = service.portfolio_id();
        assert!(matches!(service.sell_stock(id, "  ", 1).await, Err(AppError::Validation(_))));
        assert!(matches!(service.sell_stock(id, "AAPL", 0).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_total_value_tracks_market_value_of_holdings() {
        let service = service_with_price(Some("50.25"));
        let id = service.portfolio_id();
        service.add_stock(buy("AAPL", 3, "40")).await.unwrap();
        service.add_stock(buy("MSFT", 7, "60")).await.unwrap();
        service.add_stock(buy("NVDA", 2, "45")).await.unwrap();
        service.sell_stock(id, "MSFT", 7).await.unwrap();

        let holdings = service.get_holdings(id).await.unwrap();
        let sum = holdings
            .iter()
            .fold(BigDecimal::from(0), |acc, h| acc + h.market_value());
        assert_eq!(service.get_portfolio().await.unwrap().total_value, sum);
    }

    #[tokio::test]
    async fn test_history_records_each_mutation_and_ignores_range() {
        let service = service_with_price(None);
        let id = service.portfolio_id();
        assert!(service.get_portfolio_history(id, "1M").await.unwrap().is_empty());

        service.add_stock(buy("AAPL", 1, "100")).await.unwrap();
        service.add_stock(buy("MSFT", 1, "50")).await.unwrap();
        service.sell_stock(id, "AAPL", 1).await.unwrap();

        let history = service.get_portfolio_history(id, "1M").await.unwrap();
        let values: Vec<BigDecimal> = history.iter().map(|e| e.value.clone()).collect();
        assert_eq!(values, vec![BigDecimal::from(100), BigDecimal::from(150), BigDecimal::from(50)]);

        let all = service.get_portfolio_history(id, "MAX").await.unwrap();
        assert_eq!(all, history);
    }
}
