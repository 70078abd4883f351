// src/db/note_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::NoteRepository,
    models::{
        money::Money,
        note::{Note, NoteReason, NoteType},
    },
};

#[derive(Debug, sqlx::FromRow)]
struct NoteRow {
    id: Uuid,
    number: String,
    note_type: String,
    invoice_id: Uuid,
    reason: String,
    reason_description: String,
    items: Value,
    subtotal: Decimal,
    total: Decimal,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<NoteRow> for Note {
    type Error = AppError;

    fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
        let note_type = NoteType::parse(&row.note_type).ok_or_else(|| {
            AppError::InternalServerError(anyhow::anyhow!(
                "tipo de nota desconhecido no banco: {}",
                row.note_type
            ))
        })?;
        let reason = NoteReason::parse(&row.reason).ok_or_else(|| {
            AppError::InternalServerError(anyhow::anyhow!(
                "motivo de nota desconhecido no banco: {}",
                row.reason
            ))
        })?;

        Ok(Note {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            number: row.number,
            note_type,
            invoice_id: row.invoice_id,
            reason,
            reason_description: row.reason_description,
            items: serde_json::from_value(row.items)?,
            subtotal: Money::new(row.subtotal, row.currency.clone()),
            total: Money::new(row.total, row.currency),
        })
    }
}

#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        sql: &str,
        bind: Option<BindValue>,
    ) -> Result<Vec<Note>, AppError> {
        let mut query = sqlx::query_as::<_, NoteRow>(sql);
        query = match bind {
            Some(BindValue::Id(id)) => query.bind(id),
            Some(BindValue::Text(text)) => query.bind(text),
            None => query,
        };

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Note::try_from).collect()
    }
}

enum BindValue {
    Id(Uuid),
    Text(&'static str),
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn save(&self, note: &Note) -> Result<Note, AppError> {
        sqlx::query(
            r#"
            INSERT INTO notes
                (id, number, note_type, invoice_id, reason, reason_description,
                 items, subtotal, total, currency, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(note.id)
        .bind(&note.number)
        .bind(note.note_type.as_str())
        .bind(note.invoice_id)
        .bind(note.reason.as_str())
        .bind(&note.reason_description)
        .bind(serde_json::to_value(&note.items)?)
        .bind(note.subtotal.amount)
        .bind(note.total.amount)
        .bind(&note.total.currency)
        .bind(note.created_at)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(note.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        let row = sqlx::query_as::<_, NoteRow>("SELECT * FROM notes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Note::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Note>, AppError> {
        self.fetch_where("SELECT * FROM notes ORDER BY created_at DESC", None)
            .await
    }

    async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<Note>, AppError> {
        self.fetch_where(
            "SELECT * FROM notes WHERE invoice_id = $1 ORDER BY created_at DESC",
            Some(BindValue::Id(invoice_id)),
        )
        .await
    }

    async fn find_by_type(&self, note_type: NoteType) -> Result<Vec<Note>, AppError> {
        self.fetch_where(
            "SELECT * FROM notes WHERE note_type = $1 ORDER BY created_at DESC",
            Some(BindValue::Text(note_type.as_str())),
        )
        .await
    }

    async fn update(&self, note: &Note) -> Result<Note, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE notes
            SET number = $2, note_type = $3, invoice_id = $4, reason = $5,
                reason_description = $6, items = $7, subtotal = $8, total = $9,
                currency = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(note.id)
        .bind(&note.number)
        .bind(note.note_type.as_str())
        .bind(note.invoice_id)
        .bind(note.reason.as_str())
        .bind(&note.reason_description)
        .bind(serde_json::to_value(&note.items)?)
        .bind(note.subtotal.amount)
        .bind(note.total.amount)
        .bind(&note.total.currency)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NoteNotFound);
        }

        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
