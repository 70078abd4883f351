// src/models/money.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Moeda padrão de todo o sistema (pesos colombianos).
pub const DEFAULT_CURRENCY: &str = "COP";

// Valor monetário: quantia decimal + código da moeda.
// Toda a aritmética de totais acontece sobre `amount`; a consistência
// de `currency` entre itens é verificada no recálculo (fail fast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Money {
    #[schema(example = "1000.00")]
    pub amount: Decimal,

    #[schema(example = "COP")]
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Zero na moeda padrão.
    pub fn zero() -> Self {
        Self::zero_in(DEFAULT_CURRENCY)
    }

    pub fn zero_in(currency: &str) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency: currency.to_string(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}
