// src/models/item.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::money::{Money, DEFAULT_CURRENCY},
};

// Item de linha de uma fatura ou nota. Os itens pertencem ao documento
// que os contém (composição): não existem fora dele.
//
// Invariante: `total.amount == quantity * unit_price.amount`, recalculado
// a cada mutação; `total.currency == unit_price.currency`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[schema(example = "Servicio de consultoría")]
    pub description: String,

    #[schema(example = "2")]
    pub quantity: Decimal,

    pub unit_price: Money,
    pub total: Money,
}

// Payload para criar/substituir um item (reaproveitado pelos handlers).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Servicio de consultoría")]
    pub description: String,

    #[schema(example = "2")]
    pub quantity: Decimal,

    pub unit_price: Money,
}

impl LineItem {
    pub fn new(description: &str, quantity: Decimal, unit_price: Money) -> Self {
        let now = Utc::now();
        let mut item = Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            description: description.to_string(),
            quantity: quantity.max(Decimal::ZERO),
            unit_price: Money::new(unit_price.amount.max(Decimal::ZERO), unit_price.currency),
            total: Money::zero(),
        };
        item.calculate_total();
        item
    }

    /// Recalcula `total` a partir de quantidade e preço unitário.
    pub fn calculate_total(&mut self) {
        self.total = Money::new(
            self.quantity * self.unit_price.amount,
            self.unit_price.currency.clone(),
        );
        self.updated_at = Utc::now();
    }

    pub fn update_description(&mut self, description: &str) {
        self.description = description.trim().to_string();
        self.updated_at = Utc::now();
    }

    // Quantidade negativa é grampeada em zero.
    pub fn update_quantity(&mut self, quantity: Decimal) {
        self.quantity = quantity.max(Decimal::ZERO);
        self.calculate_total();
    }

    // Preço negativo também é grampeado (simétrico à quantidade).
    pub fn update_unit_price(&mut self, unit_price: Money) {
        self.unit_price = Money::new(unit_price.amount.max(Decimal::ZERO), unit_price.currency);
        self.calculate_total();
    }

    /// Um item é válido quando tem descrição não-vazia, quantidade
    /// positiva e preço unitário positivo.
    pub fn is_valid(&self) -> bool {
        !self.description.trim().is_empty()
            && self.quantity > Decimal::ZERO
            && self.unit_price.amount > Decimal::ZERO
    }
}

impl From<NewLineItem> for LineItem {
    fn from(data: NewLineItem) -> Self {
        LineItem::new(&data.description, data.quantity, data.unit_price)
    }
}

/// Moeda única de uma lista de itens. Lista vazia usa a moeda padrão;
/// qualquer divergência entre itens falha com `CurrencyMismatch`.
pub fn items_currency(items: &[LineItem]) -> Result<String, AppError> {
    let mut expected: Option<&str> = None;
    for item in items {
        match expected {
            None => expected = Some(&item.total.currency),
            Some(currency) if currency != item.total.currency => {
                return Err(AppError::CurrencyMismatch {
                    expected: currency.to_string(),
                    found: item.total.currency.clone(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(expected.unwrap_or(DEFAULT_CURRENCY).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cop(amount: i64) -> Money {
        Money::new(Decimal::new(amount, 0), "COP")
    }

    #[test]
    fn total_e_quantidade_vezes_preco() {
        let item = LineItem::new("A", Decimal::new(3, 0), cop(1500));
        assert_eq!(item.total.amount, Decimal::new(4500, 0));
        assert_eq!(item.total.currency, "COP");
    }

    #[test]
    fn quantidade_negativa_e_grampeada_em_zero() {
        let mut item = LineItem::new("A", Decimal::new(2, 0), cop(100));
        item.update_quantity(Decimal::new(-5, 0));
        assert_eq!(item.quantity, Decimal::ZERO);
        assert_eq!(item.total.amount, Decimal::ZERO);
    }

    #[test]
    fn preco_negativo_e_grampeado_em_zero() {
        let mut item = LineItem::new("A", Decimal::new(2, 0), cop(100));
        item.update_unit_price(cop(-100));
        assert_eq!(item.unit_price.amount, Decimal::ZERO);
        assert_eq!(item.total.amount, Decimal::ZERO);
    }

    #[test]
    fn valido_exige_descricao_quantidade_e_preco() {
        let item = LineItem::new("A", Decimal::new(1, 0), cop(100));
        assert!(item.is_valid());

        let em_branco = LineItem::new("   ", Decimal::new(1, 0), cop(100));
        assert!(!em_branco.is_valid());

        let sem_quantidade = LineItem::new("A", Decimal::ZERO, cop(100));
        assert!(!sem_quantidade.is_valid());

        let sem_preco = LineItem::new("A", Decimal::new(1, 0), cop(0));
        assert!(!sem_preco.is_valid());
    }

    #[test]
    fn descricao_e_aparada_na_atualizacao() {
        let mut item = LineItem::new("A", Decimal::new(1, 0), cop(100));
        item.update_description("  Producto B  ");
        assert_eq!(item.description, "Producto B");
    }

    #[test]
    fn moeda_de_lista_vazia_e_padrao() {
        assert_eq!(items_currency(&[]).unwrap(), "COP");
    }

    #[test]
    fn moedas_divergentes_falham() {
        let a = LineItem::new("A", Decimal::new(1, 0), cop(100));
        let b = LineItem::new("B", Decimal::new(1, 0), Money::new(Decimal::new(5, 0), "USD"));
        let err = items_currency(&[a, b]).unwrap_err();
        assert!(matches!(err, AppError::CurrencyMismatch { .. }));
    }
}
