// src/db/invoice_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvoiceRepository,
    models::{
        invoice::{Invoice, InvoiceStatus},
        money::Money,
    },
};

// Linha da tabela `invoices`. As partes compostas (snapshot da empresa,
// cliente, itens) vivem em colunas JSONB. O desenho do esquema não é
// o ponto aqui, o repositório só traduz linha <-> entidade.
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    number: String,
    status: String,
    company: Value,
    client: Option<Value>,
    items: Value,
    subtotal: Decimal,
    tip_amount: Decimal,
    total: Decimal,
    currency: String,
    notes: Option<String>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = AppError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let status = InvoiceStatus::parse(&row.status).ok_or_else(|| {
            AppError::InternalServerError(anyhow::anyhow!(
                "status de fatura desconhecido no banco: {}",
                row.status
            ))
        })?;

        let client = match row.client {
            Some(value) => Some(serde_json::from_value(value)?),
            None => None,
        };

        Ok(Invoice {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            number: row.number,
            status,
            company: serde_json::from_value(row.company)?,
            client,
            items: serde_json::from_value(row.items)?,
            subtotal: Money::new(row.subtotal, row.currency.clone()),
            tip_amount: Money::new(row.tip_amount, row.currency.clone()),
            total: Money::new(row.total, row.currency),
            notes: row.notes,
            due_date: row.due_date,
        })
    }
}

#[derive(Clone)]
pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    async fn save(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        sqlx::query(
            r#"
            INSERT INTO invoices
                (id, number, status, company, client, items, subtotal,
                 tip_amount, total, currency, notes, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(invoice.id)
        .bind(&invoice.number)
        .bind(invoice.status.as_str())
        .bind(serde_json::to_value(&invoice.company)?)
        .bind(match &invoice.client {
            Some(client) => Some(serde_json::to_value(client)?),
            None => None,
        })
        .bind(serde_json::to_value(&invoice.items)?)
        .bind(invoice.subtotal.amount)
        .bind(invoice.tip_amount.amount)
        .bind(invoice.total.amount)
        .bind(&invoice.total.currency)
        .bind(&invoice.notes)
        .bind(invoice.due_date)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(invoice.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let row = sqlx::query_as::<_, InvoiceRow>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Invoice::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Invoice>, AppError> {
        let rows =
            sqlx::query_as::<_, InvoiceRow>("SELECT * FROM invoices ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Invoice::try_from).collect()
    }

    async fn find_recent(&self, limit: i64) -> Result<Vec<Invoice>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            "SELECT * FROM invoices ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Invoice::try_from).collect()
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET number = $2, status = $3, company = $4, client = $5, items = $6,
                subtotal = $7, tip_amount = $8, total = $9, currency = $10,
                notes = $11, due_date = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(invoice.id)
        .bind(&invoice.number)
        .bind(invoice.status.as_str())
        .bind(serde_json::to_value(&invoice.company)?)
        .bind(match &invoice.client {
            Some(client) => Some(serde_json::to_value(client)?),
            None => None,
        })
        .bind(serde_json::to_value(&invoice.items)?)
        .bind(invoice.subtotal.amount)
        .bind(invoice.tip_amount.amount)
        .bind(invoice.total.amount)
        .bind(&invoice.total.currency)
        .bind(&invoice.notes)
        .bind(invoice.due_date)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InvoiceNotFound);
        }

        Ok(invoice.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
