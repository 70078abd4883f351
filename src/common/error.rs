// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// O núcleo levanta três famílias: NotFound, Validation e Precondition;
// o resto é infraestrutura (banco, bcrypt, JWT).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- NotFound ---
    #[error("Invoice not found")]
    InvoiceNotFound,

    #[error("Note not found")]
    NoteNotFound,

    #[error("Company not found")]
    CompanyNotFound,

    #[error("Item not found in document")]
    ItemNotFound,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // --- Regras de negócio (Validation) ---
    // Mensagem fixa, igual à que o guard de transição sempre produziu.
    #[error("Cannot complete invoice: missing required items or invalid data")]
    CannotComplete,

    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: String, found: String },

    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("{0}")]
    WeakPassword(&'static str),

    // --- Precondition ---
    #[error("Company information is required to create invoices. Please set up company data first.")]
    CompanyNotConfigured,

    // --- Autenticação ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // --- Infraestrutura ---
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Documento JSONB que não desserializa de volta para a entidade
    #[error("Registro corrompido no banco: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvoiceNotFound
            | AppError::NoteNotFound
            | AppError::CompanyNotFound
            | AppError::ItemNotFound
            | AppError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::CannotComplete
            | AppError::CurrencyMismatch { .. }
            | AppError::MissingFields(_)
            | AppError::WeakPassword(_)
            | AppError::CompanyNotConfigured => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `#[from]` cuidou da conversão; o `tracing` loga a mensagem detalhada.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
