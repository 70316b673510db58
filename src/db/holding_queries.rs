use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct HoldingRow {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub name: Option<String>,
    pub symbol: String,
    pub quantity: Option<i32>,
    pub price: Option<BigDecimal>,
    pub purchase_price: Option<BigDecimal>,
    pub purchase_date: NaiveDate,
    pub daily_change_value: Option<BigDecimal>,
    pub daily_change_percent: Option<BigDecimal>,
    pub total_change_value: Option<BigDecimal>,
    pub total_change_percent: Option<BigDecimal>,
    pub logo_url: Option<String>,
}

const HOLDING_COLUMNS: &str = "id, portfolio_id, name, symbol, quantity, price, purchase_price, purchase_date,
     daily_change_value, daily_change_percent, total_change_value, total_change_percent, logo_url";

pub async fn fetch_all(pool: &PgPool, portfolio_id: Uuid) -> Result<Vec<HoldingRow>, sqlx::Error> {
    sqlx::query_as::<_, HoldingRow>(&format!(
        "SELECT {HOLDING_COLUMNS} FROM holding WHERE portfolio_id = $1 ORDER BY created_at ASC, id ASC"
    ))
        .bind(portfolio_id)
        .fetch_all(pool)
        .await
}

pub async fn upsert(pool: &PgPool, input: HoldingRow) -> Result<HoldingRow, sqlx::Error> {
    sqlx::query_as::<_, HoldingRow>(&format!(
        "INSERT INTO holding (id, portfolio_id, name, symbol, quantity, price, purchase_price,
                              purchase_date, daily_change_value, daily_change_percent,
                              total_change_value, total_change_percent, logo_url)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
         ON CONFLICT (id) DO UPDATE
         SET name = EXCLUDED.name,
             symbol = EXCLUDED.symbol,
             quantity = EXCLUDED.quantity,
             price = EXCLUDED.price,
             purchase_price = EXCLUDED.purchase_price,
             purchase_date = EXCLUDED.purchase_date,
             daily_change_value = EXCLUDED.daily_change_value,
             daily_change_percent = EXCLUDED.daily_change_percent,
             total_change_value = EXCLUDED.total_change_value,
             total_change_percent = EXCLUDED.total_change_percent,
             logo_url = EXCLUDED.logo_url
         RETURNING {HOLDING_COLUMNS}"
    ))
        .bind(input.id)
        .bind(input.portfolio_id)
        .bind(input.name)
        .bind(input.symbol)
        .bind(input.quantity)
        .bind(input.price)
        .bind(input.purchase_price)
        .bind(input.purchase_date)
        .bind(input.daily_change_value)
        .bind(input.daily_change_percent)
        .bind(input.total_change_value)
        .bind(input.total_change_percent)
        .bind(input.logo_url)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM holding WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
