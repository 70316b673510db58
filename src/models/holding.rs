use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// A single stock position owned by a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub name: String,
    pub symbol: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub purchase_price: BigDecimal,
    pub purchase_date: NaiveDate,
    pub daily_change_value: BigDecimal,
    pub daily_change_percent: BigDecimal,
    pub total_change_value: BigDecimal,
    pub total_change_percent: BigDecimal,
    pub logo_url: Option<String>,
}

/// Request to buy a stock into the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStock {
    pub symbol: String,
    pub quantity: i32,
    pub purchase_price: BigDecimal,
    pub purchase_date: Option<NaiveDate>,
}

impl Holding {
    /// Market value at the current price.
    pub fn market_value(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }

    pub fn cost_basis(&self) -> BigDecimal {
        &self.purchase_price * BigDecimal::from(self.quantity)
    }

    /// Recomputes the total change fields from price, purchase price and quantity.
    ///
    /// The percent is the gain ratio rounded half-up to four places, then
    /// scaled to a percentage, so 250 / 1500 yields 16.67. A zero cost basis
    /// yields a zero percent. Daily change fields are left untouched.
    pub fn with_total_change(self) -> Self {
        let quantity = BigDecimal::from(self.quantity);
        let total_change_value = (&self.price - &self.purchase_price) * &quantity;
        let cost_basis = self.cost_basis();

        let total_change_percent = if cost_basis == BigDecimal::from(0) {
            BigDecimal::from(0)
        } else {
            round_half_up(&(&total_change_value / &cost_basis), 4) * BigDecimal::from(100)
        };

        Self {
            total_change_value,
            total_change_percent,
            ..self
        }
    }
}

/// Rounds to `scale` decimal places, ties away from zero.
pub fn round_half_up(value: &BigDecimal, scale: i64) -> BigDecimal {
    let half = BigDecimal::new(5.into(), scale + 1);
    if *value < BigDecimal::from(0) {
        (value - half).with_scale(scale)
    } else {
        (value + half).with_scale(scale)
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
