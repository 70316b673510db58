pub mod portfolio_service;
