use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// One recorded total value of a portfolio on a given day. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHistory {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub date: NaiveDate,
    pub value: BigDecimal,
}

impl PortfolioHistory {
    pub fn new(portfolio_id: Uuid, date: NaiveDate, value: BigDecimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            portfolio_id,
            date,
            value,
        }
    }
}
