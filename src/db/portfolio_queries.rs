use bigdecimal::BigDecimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct PortfolioRow {
    pub id: Uuid,
    pub total_value: Option<BigDecimal>,
    pub daily_change_value: Option<BigDecimal>,
    pub daily_change_percent: Option<BigDecimal>,
    pub total_change_value: Option<BigDecimal>,
    pub total_change_percent: Option<BigDecimal>,
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<PortfolioRow>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioRow>(
        "SELECT id, total_value, daily_change_value, daily_change_percent,
                total_change_value, total_change_percent
         FROM portfolio
         WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn upsert(pool: &PgPool, input: PortfolioRow) -> Result<PortfolioRow, sqlx::Error> {
    sqlx::query_as::<_, PortfolioRow>(
        "INSERT INTO portfolio (id, total_value, daily_change_value, daily_change_percent,
                                total_change_value, total_change_percent)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (id) DO UPDATE
         SET total_value = EXCLUDED.total_value,
             daily_change_value = EXCLUDED.daily_change_value,
             daily_change_percent = EXCLUDED.daily_change_percent,
             total_change_value = EXCLUDED.total_change_value,
             total_change_percent = EXCLUDED.total_change_percent
         RETURNING id, total_value, daily_change_value, daily_change_percent,
                   total_change_value, total_change_percent")
        .bind(input.id)
        .bind(input.total_value)
        .bind(input.daily_change_value)
        .bind(input.daily_change_percent)
        .bind(input.total_change_value)
        .bind(input.total_change_percent)
        .fetch_one(pool)
        .await
}
