use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct PortfolioHistoryRow {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub date: NaiveDate,
    pub value: Option<BigDecimal>,
}

pub async fn fetch_all(pool: &PgPool, portfolio_id: Uuid) -> Result<Vec<PortfolioHistoryRow>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioHistoryRow>(
        "SELECT id, portfolio_id, date, value
         FROM portfolio_history
         WHERE portfolio_id = $1
         ORDER BY date ASC, recorded_at ASC")
        .bind(portfolio_id)
        .fetch_all(pool)
        .await
}

pub async fn insert(pool: &PgPool, input: PortfolioHistoryRow) -> Result<PortfolioHistoryRow, sqlx::Error> {
    sqlx::query_as::<_, PortfolioHistoryRow>(
        "INSERT INTO portfolio_history (id, portfolio_id, date, value)
         VALUES ($1, $2, $3, $4)
         RETURNING id, portfolio_id, date, value")
        .bind(input.id)
        .bind(input.portfolio_id)
        .bind(input.date)
        .bind(input.value)
        .fetch_one(pool)
        .await
}
