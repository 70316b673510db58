use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AddStock, Holding, Portfolio, PortfolioHistory};
use crate::ports::inbound::{
    AddStockUseCase, GetHoldingsUseCase, GetPortfolioHistoryUseCase, GetPortfolioUseCase,
    SellStockUseCase,
};
use crate::state::AppState;

const DEFAULT_RANGE: &str = "1M";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_portfolio))
        .route("/holdings", get(get_holdings).post(add_stock))
        .route("/holdings/:symbol", delete(sell_stock))
        .route("/history", get(get_portfolio_history))
}

/// Writes a decimal as a JSON number, the shape the dashboard client reads.
fn as_number<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // Parsing the decimal text gives the nearest f64, unlike scaling the mantissa.
    let number: f64 = value.to_string().parse().map_err(S::Error::custom)?;
    if !number.is_finite() {
        return Err(S::Error::custom(format!("decimal {} does not fit in f64", value)));
    }
    serializer.serialize_f64(number)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub id: Uuid,
    #[serde(serialize_with = "as_number")]
    pub total_value: BigDecimal,
    #[serde(serialize_with = "as_number")]
    pub daily_change_value: BigDecimal,
    #[serde(serialize_with = "as_number")]
    pub daily_change_percent: BigDecimal,
    #[serde(serialize_with = "as_number")]
    pub total_change_value: BigDecimal,
    #[serde(serialize_with = "as_number")]
    pub total_change_percent: BigDecimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingResponse {
    pub id: Uuid,
    pub name: String,
    pub symbol: String,
    pub quantity: i32,
    #[serde(serialize_with = "as_number")]
    pub price: BigDecimal,
    #[serde(serialize_with = "as_number")]
    pub daily_change_value: BigDecimal,
    #[serde(serialize_with = "as_number")]
    pub daily_change_percent: BigDecimal,
    #[serde(serialize_with = "as_number")]
    pub total_change_value: BigDecimal,
    #[serde(serialize_with = "as_number")]
    pub total_change_percent: BigDecimal,
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PortfolioHistoryResponse {
    pub date: NaiveDate,
    #[serde(serialize_with = "as_number")]
    pub value: BigDecimal,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SellParams {
    pub quantity: i32,
}

impl From<Portfolio> for PortfolioResponse {
    fn from(p: Portfolio) -> Self {
        Self {
            id: p.id,
            total_value: p.total_value,
            daily_change_value: p.daily_change_value,
            daily_change_percent: p.daily_change_percent,
            total_change_value: p.total_change_value,
            total_change_percent: p.total_change_percent,
        }
    }
}

impl From<Holding> for HoldingResponse {
    fn from(h: Holding) -> Self {
        Self {
            id: h.id,
            name: h.name,
            symbol: h.symbol,
            quantity: h.quantity,
            price: h.price,
            daily_change_value: h.daily_change_value,
            daily_change_percent: h.daily_change_percent,
            total_change_value: h.total_change_value,
            total_change_percent: h.total_change_percent,
            logo_url: h.logo_url,
        }
    }
}

impl From<PortfolioHistory> for PortfolioHistoryResponse {
    fn from(e: PortfolioHistory) -> Self {
        Self {
            date: e.date,
            value: e.value,
        }
    }
}

pub async fn get_portfolio(
    State(state): State<AppState>,
) -> Result<Json<PortfolioResponse>, AppError> {
    info!("GET /portfolio - Fetching portfolio");
    let portfolio = state.portfolio_service.get_portfolio().await
        .map_err(|e| {
            error!("Failed to fetch portfolio: {}", e);
            e
        })?;
    Ok(Json(portfolio.into()))
}

pub async fn get_holdings(
    State(state): State<AppState>,
) -> Result<Json<Vec<HoldingResponse>>, AppError> {
    let portfolio_id = state.portfolio_service.portfolio_id();
    info!("GET /portfolio/holdings - Fetching holdings of {}", portfolio_id);
    let holdings = state.portfolio_service.get_holdings(portfolio_id).await
        .map_err(|e| {
            error!("Failed to fetch holdings of {}: {}", portfolio_id, e);
            e
        })?;
    Ok(Json(holdings.into_iter().map(HoldingResponse::from).collect()))
}

pub async fn get_portfolio_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<PortfolioHistoryResponse>>, AppError> {
    let portfolio_id = state.portfolio_service.portfolio_id();
    let range = params.range.as_deref().unwrap_or(DEFAULT_RANGE);
    info!("GET /portfolio/history - Fetching history with range {}", range);
    let history = state.portfolio_service.get_portfolio_history(portfolio_id, range).await
        .map_err(|e| {
            error!("Failed to fetch history of {}: {}", portfolio_id, e);
            e
        })?;
    Ok(Json(history.into_iter().map(PortfolioHistoryResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn add_stock(
    State(state): State<AppState>,
    Json(data): Json<AddStock>,
) -> Result<Json<HoldingResponse>, AppError> {
    info!("POST /portfolio/holdings - Adding {} x {}", data.quantity, data.symbol);
    let holding = state.portfolio_service.add_stock(data).await
        .map_err(|e| {
            error!("Failed to add stock: {}", e);
            e
        })?;
    Ok(Json(holding.into()))
}

pub async fn sell_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<SellParams>,
) -> Result<StatusCode, AppError> {
    let portfolio_id = state.portfolio_service.portfolio_id();
    info!("DELETE /portfolio/holdings/{} - Selling quantity {}", symbol, params.quantity);
    state.portfolio_service.sell_stock(portfolio_id, &symbol, params.quantity).await
        .map_err(|e| {
            error!("Failed to sell {}: {}", symbol, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
