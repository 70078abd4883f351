// src/handlers/invoices.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        client::ClientDraft,
        invoice::{Invoice, InvoiceStats, InvoiceStatus},
        item::NewLineItem,
        note::{InvoiceBalance, Note},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesQuery {
    /// Limita o resultado às N faturas mais recentes
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    #[validate(nested)]
    pub client: Option<ClientDraft>,
}

// Corpo do PUT: substituição completa da fatura
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceInvoicePayload {
    #[validate(nested)]
    pub client: Option<ClientDraft>,

    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<NewLineItem>,

    pub notes: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    pub status: InvoiceStatus,
}

// GET /api/invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoices",
    params(ListInvoicesQuery),
    responses(
        (status = 200, description = "Faturas, mais recentes primeiro", body = [Invoice])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = match query.limit {
        Some(limit) => app_state.invoice_service.get_recent_invoices(limit).await?,
        None => app_state.invoice_service.get_all_invoices().await?,
    };

    Ok((StatusCode::OK, Json(invoices)))
}

// POST /api/invoices
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Invoices",
    request_body = CreateInvoicePayload,
    responses(
        (status = 201, description = "Fatura criada em rascunho", body = Invoice),
        (status = 400, description = "Perfil da empresa não configurado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invoice = app_state
        .invoice_service
        .create_invoice(payload.client.map(Into::into))
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// GET /api/invoices/stats
#[utoipa::path(
    get,
    path = "/api/invoices/stats",
    tag = "Invoices",
    responses(
        (status = 200, description = "Agregados sobre todas as faturas", body = InvoiceStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn invoice_stats(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.invoice_service.stats().await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Id da fatura")),
    responses(
        (status = 200, description = "Fatura encontrada", body = Invoice),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state.invoice_service.get_invoice(id).await?;
    Ok((StatusCode::OK, Json(invoice)))
}

// PUT /api/invoices/{id}
#[utoipa::path(
    put,
    path = "/api/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Id da fatura")),
    request_body = ReplaceInvoicePayload,
    responses(
        (status = 200, description = "Fatura substituída", body = Invoice),
        (status = 400, description = "Transição de estado inválida"),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn replace_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invoice = app_state
        .invoice_service
        .replace_invoice(
            id,
            payload.client.map(Into::into),
            payload.items,
            payload.notes,
            payload.due_date,
            payload.status.unwrap_or(InvoiceStatus::Draft),
        )
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// DELETE /api/invoices/{id}
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Id da fatura")),
    responses(
        (status = 204, description = "Fatura excluída"),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.invoice_service.delete_invoice(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/invoices/{id}/status
#[utoipa::path(
    put,
    path = "/api/invoices/{id}/status",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Id da fatura")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Estado atualizado", body = Invoice),
        (status = 400, description = "Fatura não pode ser concluída"),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_invoice_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state
        .invoice_service
        .update_status(id, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// POST /api/invoices/{id}/items
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/items",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Id da fatura")),
    request_body = NewLineItem,
    responses(
        (status = 200, description = "Item adicionado, totais recalculados", body = Invoice),
        (status = 400, description = "Moeda diferente das demais linhas"),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_invoice_item(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewLineItem>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invoice = app_state
        .invoice_service
        .add_item(id, &payload.description, payload.quantity, payload.unit_price)
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// PUT /api/invoices/{id}/items/{item_id}
#[utoipa::path(
    put,
    path = "/api/invoices/{id}/items/{item_id}",
    tag = "Invoices",
    params(
        ("id" = Uuid, Path, description = "Id da fatura"),
        ("item_id" = Uuid, Path, description = "Id do item")
    ),
    request_body = NewLineItem,
    responses(
        (status = 200, description = "Item atualizado, totais recalculados", body = Invoice),
        (status = 404, description = "Fatura ou item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_invoice_item(
    State(app_state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<NewLineItem>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invoice = app_state
        .invoice_service
        .update_item(
            id,
            item_id,
            &payload.description,
            payload.quantity,
            payload.unit_price,
        )
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// DELETE /api/invoices/{id}/items/{item_id}
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}/items/{item_id}",
    tag = "Invoices",
    params(
        ("id" = Uuid, Path, description = "Id da fatura"),
        ("item_id" = Uuid, Path, description = "Id do item")
    ),
    responses(
        (status = 200, description = "Item removido, totais recalculados", body = Invoice),
        (status = 404, description = "Fatura ou item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_invoice_item(
    State(app_state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state.invoice_service.remove_item(id, item_id).await?;
    Ok((StatusCode::OK, Json(invoice)))
}

// GET /api/invoices/{id}/balance
#[utoipa::path(
    get,
    path = "/api/invoices/{id}/balance",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Id da fatura")),
    responses(
        (status = 200, description = "Saldo efetivo considerando as notas", body = InvoiceBalance),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn invoice_balance(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let balance = app_state.note_service.invoice_balance(id).await?;
    Ok((StatusCode::OK, Json(balance)))
}

// GET /api/invoices/{id}/notes
#[utoipa::path(
    get,
    path = "/api/invoices/{id}/notes",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Id da fatura")),
    responses(
        (status = 200, description = "Notas emitidas contra a fatura", body = [Note])
    ),
    security(("api_jwt" = []))
)]
pub async fn invoice_notes(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let notes = app_state.note_service.get_notes_by_invoice(id).await?;
    Ok((StatusCode::OK, Json(notes)))
}
