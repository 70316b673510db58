pub mod holding_queries;
pub mod portfolio_history_queries;
pub mod portfolio_queries;
