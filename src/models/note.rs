// src/models/note.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        invoice::generate_number,
        item::{items_currency, LineItem},
        money::Money,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Credit,
    Debit,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::Credit => "credit",
            NoteType::Debit => "debit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "credit" => Some(NoteType::Credit),
            "debit" => Some(NoteType::Debit),
            _ => None,
        }
    }

    fn number_prefix(&self) -> &'static str {
        match self {
            NoteType::Credit => "NC",
            NoteType::Debit => "ND",
        }
    }
}

// Motivos fechados para emissão de nota (DIAN usa códigos parecidos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoteReason {
    ProductReturn,
    DefectiveProduct,
    PriceAdjustment,
    Discount,
    ServiceNotProvided,
    AdditionalCharge,
    MissingItems,
    InterestCharges,
    ShippingAdjustment,
    Other,
}

impl NoteReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteReason::ProductReturn => "product_return",
            NoteReason::DefectiveProduct => "defective_product",
            NoteReason::PriceAdjustment => "price_adjustment",
            NoteReason::Discount => "discount",
            NoteReason::ServiceNotProvided => "service_not_provided",
            NoteReason::AdditionalCharge => "additional_charge",
            NoteReason::MissingItems => "missing_items",
            NoteReason::InterestCharges => "interest_charges",
            NoteReason::ShippingAdjustment => "shipping_adjustment",
            NoteReason::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "product_return" => Some(NoteReason::ProductReturn),
            "defective_product" => Some(NoteReason::DefectiveProduct),
            "price_adjustment" => Some(NoteReason::PriceAdjustment),
            "discount" => Some(NoteReason::Discount),
            "service_not_provided" => Some(NoteReason::ServiceNotProvided),
            "additional_charge" => Some(NoteReason::AdditionalCharge),
            "missing_items" => Some(NoteReason::MissingItems),
            "interest_charges" => Some(NoteReason::InterestCharges),
            "shipping_adjustment" => Some(NoteReason::ShippingAdjustment),
            "other" => Some(NoteReason::Other),
            _ => None,
        }
    }
}

// Nota crédito/débito. Documento independente que referencia a fatura
// por id: um razão de ajustes append-only. Criar uma nota NUNCA muta
// a fatura original. Os itens da nota são dela, não referências aos
// itens da fatura.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[schema(example = "NC-20260829-123456")]
    pub number: String,

    #[serde(rename = "type")]
    pub note_type: NoteType,

    pub invoice_id: Uuid,
    pub reason: NoteReason,

    #[schema(example = "Devolución parcial del pedido")]
    pub reason_description: String,

    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub total: Money,
}

impl Note {
    pub fn new(
        note_type: NoteType,
        invoice_id: Uuid,
        reason: NoteReason,
        reason_description: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            number: generate_number(note_type.number_prefix()),
            note_type,
            invoice_id,
            reason,
            reason_description: reason_description.to_string(),
            items: Vec::new(),
            subtotal: Money::zero(),
            total: Money::zero(),
        }
    }

    pub fn add_item(&mut self, item: LineItem) -> Result<(), AppError> {
        self.items.push(item);
        self.calculate_totals()
    }

    pub fn remove_item(&mut self, item_id: Uuid) -> Result<(), AppError> {
        self.items.retain(|item| item.id != item_id);
        self.calculate_totals()
    }

    pub fn update_item(
        &mut self,
        item_id: Uuid,
        description: &str,
        quantity: Decimal,
        unit_price: Money,
    ) -> Result<(), AppError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(AppError::ItemNotFound)?;

        item.update_description(description);
        item.update_quantity(quantity);
        item.update_unit_price(unit_price);

        self.calculate_totals()
    }

    /// Notas não têm gorjeta: total == subtotal.
    pub fn calculate_totals(&mut self) -> Result<(), AppError> {
        let currency = items_currency(&self.items)?;

        let subtotal: Decimal = self.items.iter().map(|item| item.total.amount).sum();
        self.subtotal = Money::new(subtotal, currency.clone());
        self.total = Money::new(subtotal, currency);
        self.updated_at = Utc::now();
        Ok(())
    }
}

// Saldo efetivo de uma fatura depois de aplicar as notas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceBalance {
    #[schema(example = "100000")]
    pub original_amount: Decimal,

    #[schema(example = "20000")]
    pub credit_notes_total: Decimal,

    #[schema(example = "5000")]
    pub debit_notes_total: Decimal,

    #[schema(example = "85000")]
    pub final_balance: Decimal,
}

impl InvoiceBalance {
    /// `final = original - Σcréditos + Σdébitos`, particionando as
    /// notas por tipo.
    pub fn calculate(original_amount: Decimal, notes: &[Note]) -> Self {
        let credit_notes_total: Decimal = notes
            .iter()
            .filter(|n| n.note_type == NoteType::Credit)
            .map(|n| n.total.amount)
            .sum();

        let debit_notes_total: Decimal = notes
            .iter()
            .filter(|n| n.note_type == NoteType::Debit)
            .map(|n| n.total.amount)
            .sum();

        Self {
            original_amount,
            credit_notes_total,
            debit_notes_total,
            final_balance: original_amount - credit_notes_total + debit_notes_total,
        }
    }
}
