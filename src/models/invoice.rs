// src/models/invoice.rs

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        client::Client,
        company::Company,
        item::{items_currency, LineItem},
        money::Money,
    },
};

// Ciclo de vida: draft -> pending -> completed.
// `completed` só com itens válidos; voltar de `completed` para trás é
// permitido sem guarda (deliberado, coberto por teste).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Completed,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(InvoiceStatus::Draft),
            "pending" => Some(InvoiceStatus::Pending),
            "completed" => Some(InvoiceStatus::Completed),
            _ => None,
        }
    }
}

// Fatura. Dona dos seus itens (composição) e de um SNAPSHOT da empresa
// tirado na criação (alterar o perfil depois não muda faturas antigas).
// Os campos derivados (subtotal, tip_amount, total) são sempre
// recalculados a partir da lista completa de itens, nunca incrementais.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[schema(example = "INV-20260829-123456")]
    pub number: String,

    pub status: InvoiceStatus,
    pub company: Company,
    pub client: Option<Client>,
    pub items: Vec<LineItem>,

    pub subtotal: Money,
    pub tip_amount: Money,
    pub total: Money,

    #[schema(example = "Entrega en la sede norte")]
    pub notes: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Invoice {
    pub fn new(company: Company, client: Option<Client>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            number: generate_number("INV"),
            status: InvoiceStatus::Draft,
            company,
            client,
            items: Vec::new(),
            subtotal: Money::zero(),
            tip_amount: Money::zero(),
            total: Money::zero(),
            notes: None,
            due_date: None,
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

    pub fn set_client(&mut self, client: Option<Client>) {
        self.client = client;
        self.updated_at = Utc::now();
    }

    /// Recalcula subtotal, gorjeta e total varrendo a lista inteira de
    /// itens (O(n)). Falha se os itens misturarem moedas.
    pub fn calculate_totals(&mut self) -> Result<(), AppError> {
        let currency = items_currency(&self.items)?;

        let subtotal: Decimal = self.items.iter().map(|item| item.total.amount).sum();
        self.subtotal = Money::new(subtotal, currency.clone());

        self.tip_amount = if self.company.tip_enabled {
            Money::new(
                subtotal * self.company.tip_percentage / Decimal::new(100, 0),
                currency.clone(),
            )
        } else {
            Money::zero_in(&currency)
        };

        self.total = Money::new(self.subtotal.amount + self.tip_amount.amount, currency);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Avaliado ao vivo no momento da transição, nunca cacheado,
    /// porque os itens podem mudar entre uma checagem e outra.
    pub fn can_be_completed(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(LineItem::is_valid)
    }

    /// Transição de estado. `completed` exige `can_be_completed`;
    /// `draft` e `pending` são incondicionais.
    pub fn set_status(&mut self, status: InvoiceStatus) -> Result<(), AppError> {
        if status == InvoiceStatus::Completed && !self.can_be_completed() {
            return Err(AppError::CannotComplete);
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }
}

// Agregados para o painel (somente faturas `completed` geram receita).
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStats {
    pub total_invoices: u64,
    pub completed_invoices: u64,
    pub pending_invoices: u64,
    pub total_revenue: Decimal,
    pub monthly_revenue: Decimal,
}

impl InvoiceStats {
    pub fn from_invoices(invoices: &[Invoice], now: DateTime<Utc>) -> Self {
        let mut stats = InvoiceStats::default();
        for invoice in invoices {
            stats.total_invoices += 1;
            match invoice.status {
                InvoiceStatus::Completed => {
                    stats.completed_invoices += 1;
                    stats.total_revenue += invoice.total.amount;
                    if invoice.updated_at.year() == now.year()
                        && invoice.updated_at.month() == now.month()
                    {
                        stats.monthly_revenue += invoice.total.amount;
                    }
                }
                InvoiceStatus::Pending => stats.pending_invoices += 1,
                InvoiceStatus::Draft => {}
            }
        }
        stats
    }
}

/// Número de documento no formato `PREFIX-YYYYMMDD-XXXXXX`.
pub(crate) fn generate_number(prefix: &str) -> String {
    let now = Utc::now();
    let suffix = now.timestamp_millis().rem_euclid(1_000_000);
    format!("{}-{}-{:06}", prefix, now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::NewCompany;

    fn company(tip_enabled: bool, tip_percentage: i64) -> Company {
        Company::new(NewCompany {
            name: "La Espiga".into(),
            address: None,
            phone: None,
            email: None,
            website: None,
            tax_id: None,
            logo: None,
            tip_percentage: Some(Decimal::new(tip_percentage, 0)),
            tip_enabled: Some(tip_enabled),
        })
    }

    fn cop(amount: i64) -> Money {
        Money::new(Decimal::new(amount, 0), "COP")
    }

    fn item(desc: &str, qty: i64, price: i64) -> LineItem {
        LineItem::new(desc, Decimal::new(qty, 0), cop(price))
    }

    #[test]
    fn fatura_vazia_tem_totais_zerados() {
        let invoice = Invoice::new(company(true, 10), None);
        assert!(invoice.subtotal.is_zero());
        assert!(invoice.tip_amount.is_zero());
        assert!(invoice.total.is_zero());
        assert_eq!(invoice.status, InvoiceStatus::Draft);
    }

    // Exemplo ponta a ponta da regra de negócio:
    // itens [2 x 1000, 1 x 500] com gorjeta de 10% => 2500 / 250 / 2750.
    #[test]
    fn exemplo_completo_de_totais_com_gorjeta() {
        let mut invoice = Invoice::new(company(true, 10), None);
        invoice.add_item(item("A", 2, 1000)).unwrap();
        invoice.add_item(item("B", 1, 500)).unwrap();

        assert_eq!(invoice.subtotal.amount, Decimal::new(2500, 0));
        assert_eq!(invoice.tip_amount.amount, Decimal::new(250, 0));
        assert_eq!(invoice.total.amount, Decimal::new(2750, 0));
    }

    #[test]
    fn gorjeta_desabilitada_e_sempre_zero() {
        let mut invoice = Invoice::new(company(false, 99), None);
        invoice.add_item(item("A", 2, 1000)).unwrap();

        assert_eq!(invoice.tip_amount.amount, Decimal::ZERO);
        assert_eq!(invoice.total.amount, invoice.subtotal.amount);
    }

    #[test]
    fn total_e_sempre_subtotal_mais_gorjeta() {
        let mut invoice = Invoice::new(company(true, 7), None);
        invoice.add_item(item("A", 3, 333)).unwrap();
        invoice.add_item(item("B", 5, 120)).unwrap();

        assert_eq!(
            invoice.total.amount,
            invoice.subtotal.amount + invoice.tip_amount.amount
        );
    }

    #[test]
    fn recalculo_sem_mudanca_de_itens_e_idempotente() {
        let mut invoice = Invoice::new(company(true, 10), None);
        invoice.add_item(item("A", 2, 1000)).unwrap();

        let (s1, t1, tot1) = (
            invoice.subtotal.amount,
            invoice.tip_amount.amount,
            invoice.total.amount,
        );
        invoice.calculate_totals().unwrap();
        invoice.calculate_totals().unwrap();

        assert_eq!(invoice.subtotal.amount, s1);
        assert_eq!(invoice.tip_amount.amount, t1);
        assert_eq!(invoice.total.amount, tot1);
    }

    #[test]
    fn remover_item_recalcula_totais() {
        let mut invoice = Invoice::new(company(false, 0), None);
        let a = item("A", 2, 1000);
        let a_id = a.id;
        invoice.add_item(a).unwrap();
        invoice.add_item(item("B", 1, 500)).unwrap();

        invoice.remove_item(a_id).unwrap();
        assert_eq!(invoice.subtotal.amount, Decimal::new(500, 0));
    }

    #[test]
    fn atualizar_item_inexistente_falha() {
        let mut invoice = Invoice::new(company(false, 0), None);
        let err = invoice
            .update_item(Uuid::new_v4(), "X", Decimal::ONE, cop(100))
            .unwrap_err();
        assert!(matches!(err, AppError::ItemNotFound));
    }

    #[test]
    fn moedas_misturadas_falham_no_recalculo() {
        let mut invoice = Invoice::new(company(false, 0), None);
        invoice.add_item(item("A", 1, 100)).unwrap();

        let usd = LineItem::new("B", Decimal::ONE, Money::new(Decimal::new(5, 0), "USD"));
        let err = invoice.add_item(usd).unwrap_err();
        assert!(matches!(err, AppError::CurrencyMismatch { .. }));
    }

    #[test]
    fn fatura_sem_itens_nao_pode_ser_concluida() {
        let mut invoice = Invoice::new(company(true, 10), None);
        assert!(!invoice.can_be_completed());

        let err = invoice.set_status(InvoiceStatus::Completed).unwrap_err();
        assert!(matches!(err, AppError::CannotComplete));
        assert_eq!(invoice.status, InvoiceStatus::Draft);
    }

    #[test]
    fn fatura_com_itens_validos_pode_ser_concluida() {
        let mut invoice = Invoice::new(company(true, 10), None);
        invoice.add_item(item("A", 2, 1000)).unwrap();

        invoice.set_status(InvoiceStatus::Completed).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Completed);
    }

    #[test]
    fn item_invalido_bloqueia_conclusao() {
        let mut invoice = Invoice::new(company(true, 10), None);
        invoice.add_item(item("", 2, 1000)).unwrap();

        let err = invoice.set_status(InvoiceStatus::Completed).unwrap_err();
        assert!(matches!(err, AppError::CannotComplete));
    }

    // A guarda é reavaliada ao vivo: concluir, esvaziar e tentar
    // concluir de novo tem que falhar.
    #[test]
    fn reconcluir_apos_remover_itens_falha() {
        let mut invoice = Invoice::new(company(true, 10), None);
        let a = item("A", 2, 1000);
        let a_id = a.id;
        invoice.add_item(a).unwrap();
        invoice.set_status(InvoiceStatus::Completed).unwrap();

        invoice.remove_item(a_id).unwrap();
        let err = invoice.set_status(InvoiceStatus::Completed).unwrap_err();
        assert!(matches!(err, AppError::CannotComplete));
    }

    // Voltar de `completed` para `draft`/`pending` não tem guarda.
    // Comportamento deliberado, coberto aqui para não regredir.
    #[test]
    fn transicao_para_tras_e_permitida() {
        let mut invoice = Invoice::new(company(true, 10), None);
        invoice.add_item(item("A", 2, 1000)).unwrap();
        invoice.set_status(InvoiceStatus::Completed).unwrap();

        invoice.set_status(InvoiceStatus::Draft).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Draft);

        invoice.set_status(InvoiceStatus::Pending).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Pending);
    }

    #[test]
    fn numero_tem_prefixo_e_data() {
        let number = generate_number("INV");
        assert!(number.starts_with("INV-"));
        assert_eq!(number.len(), "INV-20260829-123456".len());
    }

    #[test]
    fn stats_contam_somente_receita_concluida() {
        let mut concluida = Invoice::new(company(false, 0), None);
        concluida.add_item(item("A", 1, 1000)).unwrap();
        concluida.set_status(InvoiceStatus::Completed).unwrap();

        let mut pendente = Invoice::new(company(false, 0), None);
        pendente.add_item(item("B", 1, 700)).unwrap();
        pendente.set_status(InvoiceStatus::Pending).unwrap();

        let rascunho = Invoice::new(company(false, 0), None);

        let stats = InvoiceStats::from_invoices(
            &[concluida.clone(), pendente, rascunho],
            Utc::now(),
        );

        assert_eq!(stats.total_invoices, 3);
        assert_eq!(stats.completed_invoices, 1);
        assert_eq!(stats.pending_invoices, 1);
        assert_eq!(stats.total_revenue, Decimal::new(1000, 0));
        assert_eq!(stats.monthly_revenue, Decimal::new(1000, 0));
    }
}
