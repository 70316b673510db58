use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Holding, PortfolioHistory};

// The aggregate a user's positions roll up into. Only one exists per deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: Uuid,
    pub total_value: BigDecimal,
    pub daily_change_value: BigDecimal,
    pub daily_change_percent: BigDecimal,
    pub total_change_value: BigDecimal,
    pub total_change_percent: BigDecimal,
    pub holdings: Vec<Holding>,
    pub history: Vec<PortfolioHistory>,
}

impl Portfolio {
    /// A freshly provisioned portfolio with every monetary field at `0.00`.
    pub fn empty(id: Uuid) -> Self {
        Self {
            id,
            total_value: zero_money(),
            daily_change_value: zero_money(),
            daily_change_percent: zero_money(),
            total_change_value: zero_money(),
            total_change_percent: zero_money(),
            holdings: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn with_total_value(self, total_value: BigDecimal) -> Self {
        Self { total_value, ..self }
    }
}

fn zero_money() -> BigDecimal {
    BigDecimal::new(0.into(), 2)
}
