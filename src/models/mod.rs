mod holding;
mod portfolio;
mod portfolio_history;

pub use holding::{normalize_symbol, round_half_up, AddStock, Holding};
pub use portfolio::Portfolio;
pub use portfolio_history::PortfolioHistory;
