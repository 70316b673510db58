use std::sync::Arc;

use crate::services::portfolio_service::PortfolioService;

#[derive(Clone)]
pub struct AppState {
    pub portfolio_service: Arc<PortfolioService>,
}

#[cfg(test)]
pub fn create_test_state() -> AppState {
    use crate::external::simulated::FixedPriceProvider;
    use crate::services::portfolio_service::PortfolioSettings;
    use crate::store::MemoryStore;

    let service = PortfolioService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedPriceProvider::default()),
        PortfolioSettings {
            portfolio_id: uuid::Uuid::parse_str(crate::config::DEFAULT_PORTFOLIO_ID)
                .expect("valid default portfolio id"),
            logo_url_template: crate::config::DEFAULT_LOGO_URL_TEMPLATE.to_string(),
        },
    );
    AppState {
        portfolio_service: Arc::new(service),
    }
}
