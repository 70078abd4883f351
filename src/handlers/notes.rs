// src/handlers/notes.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        item::NewLineItem,
        note::{Note, NoteReason, NoteType},
    },
    services::note_service::{NewNote, NoteUpdate},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesQuery {
    /// Filtra pelas notas de uma fatura
    pub invoice_id: Option<Uuid>,

    /// Filtra por tipo: credit ou debit
    #[serde(rename = "type")]
    pub note_type: Option<NoteType>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotePayload {
    #[serde(rename = "type")]
    pub note_type: NoteType,

    pub invoice_id: Uuid,
    pub reason: NoteReason,

    #[validate(length(min = 1, message = "A descrição do motivo é obrigatória."))]
    pub reason_description: String,

    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<NewLineItem>,
}

// Corpo do PUT/PATCH: todos os campos opcionais; `items` presente
// substitui a lista inteira.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotePayload {
    #[serde(rename = "type")]
    pub note_type: Option<NoteType>,

    pub reason: Option<NoteReason>,

    #[validate(length(min = 1, message = "A descrição do motivo é obrigatória."))]
    pub reason_description: Option<String>,

    #[validate(nested)]
    pub items: Option<Vec<NewLineItem>>,
}

// GET /api/notes
#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "Notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "Notas, opcionalmente filtradas", body = [Note])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notes(
    State(app_state): State<AppState>,
    Query(query): Query<ListNotesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let notes = match (query.invoice_id, query.note_type) {
        (Some(invoice_id), _) => app_state.note_service.get_notes_by_invoice(invoice_id).await?,
        (None, Some(note_type)) => app_state.note_service.get_notes_by_type(note_type).await?,
        (None, None) => app_state.note_service.get_all_notes().await?,
    };

    Ok((StatusCode::OK, Json(notes)))
}

// POST /api/notes
#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "Notes",
    request_body = CreateNotePayload,
    responses(
        (status = 201, description = "Nota emitida", body = Note),
        (status = 404, description = "Fatura referenciada não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_note(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateNotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let note = app_state
        .note_service
        .create_note(NewNote {
            note_type: payload.note_type,
            invoice_id: payload.invoice_id,
            reason: payload.reason,
            reason_description: payload.reason_description,
            items: payload.items,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

// GET /api/notes/{id}
#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Id da nota")),
    responses(
        (status = 200, description = "Nota encontrada", body = Note),
        (status = 404, description = "Nota não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_note(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let note = app_state.note_service.get_note(id).await?;
    Ok((StatusCode::OK, Json(note)))
}

// PUT/PATCH /api/notes/{id}
#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Id da nota")),
    request_body = UpdateNotePayload,
    responses(
        (status = 200, description = "Nota atualizada, totais recalculados", body = Note),
        (status = 404, description = "Nota não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_note(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let note = app_state
        .note_service
        .update_note(
            id,
            NoteUpdate {
                note_type: payload.note_type,
                reason: payload.reason,
                reason_description: payload.reason_description,
                items: payload.items,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(note)))
}

// DELETE /api/notes/{id}
#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Id da nota")),
    responses(
        (status = 204, description = "Nota excluída"),
        (status = 404, description = "Nota não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_note(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.note_service.delete_note(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/notes/{id}/items
#[utoipa::path(
    post,
    path = "/api/notes/{id}/items",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Id da nota")),
    request_body = NewLineItem,
    responses(
        (status = 200, description = "Item adicionado, totais recalculados", body = Note),
        (status = 404, description = "Nota não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_note_item(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewLineItem>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let note = app_state
        .note_service
        .add_item(id, &payload.description, payload.quantity, payload.unit_price)
        .await?;

    Ok((StatusCode::OK, Json(note)))
}

// PUT /api/notes/{id}/items/{item_id}
#[utoipa::path(
    put,
    path = "/api/notes/{id}/items/{item_id}",
    tag = "Notes",
    params(
        ("id" = Uuid, Path, description = "Id da nota"),
        ("item_id" = Uuid, Path, description = "Id do item")
    ),
    request_body = NewLineItem,
    responses(
        (status = 200, description = "Item atualizado, totais recalculados", body = Note),
        (status = 404, description = "Nota ou item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_note_item(
    State(app_state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<NewLineItem>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let note = app_state
        .note_service
        .update_item(
            id,
            item_id,
            &payload.description,
            payload.quantity,
            payload.unit_price,
        )
        .await?;

    Ok((StatusCode::OK, Json(note)))
}

// DELETE /api/notes/{id}/items/{item_id}
#[utoipa::path(
    delete,
    path = "/api/notes/{id}/items/{item_id}",
    tag = "Notes",
    params(
        ("id" = Uuid, Path, description = "Id da nota"),
        ("item_id" = Uuid, Path, description = "Id do item")
    ),
    responses(
        (status = 200, description = "Item removido, totais recalculados", body = Note),
        (status = 404, description = "Nota ou item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_note_item(
    State(app_state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let note = app_state.note_service.remove_item(id, item_id).await?;
    Ok((StatusCode::OK, Json(note)))
}
