// src/handlers/company.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::company::{Company, CompanyUpdate, NewCompany},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Panadería La Espiga")]
    pub name: String,

    pub address: Option<String>,
    pub phone: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub website: Option<String>,
    pub tax_id: Option<String>,
    pub logo: Option<String>,

    #[schema(example = "10")]
    pub tip_percentage: Option<Decimal>,

    #[schema(example = true)]
    pub tip_enabled: Option<bool>,
}

// Atualização parcial. O id vai no corpo, não na rota.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    pub id: Option<Uuid>,

    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub website: Option<String>,
    pub tax_id: Option<String>,
    pub logo: Option<String>,
    pub tip_percentage: Option<Decimal>,
    pub tip_enabled: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TipSettingsPayload {
    pub company_id: Uuid,

    #[schema(example = "10")]
    pub tip_percentage: Decimal,

    #[schema(example = true)]
    pub tip_enabled: bool,
}

// GET /api/company
#[utoipa::path(
    get,
    path = "/api/company",
    tag = "Company",
    responses(
        (status = 200, description = "Perfil da empresa", body = Company),
        (status = 404, description = "Nenhum perfil configurado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state
        .company_service
        .get_company()
        .await?
        .ok_or(AppError::CompanyNotFound)?;

    Ok((StatusCode::OK, Json(company)))
}

// POST /api/company
#[utoipa::path(
    post,
    path = "/api/company",
    tag = "Company",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Perfil criado", body = Company),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company = app_state
        .company_service
        .create_company(NewCompany {
            name: payload.name,
            address: payload.address,
            phone: payload.phone,
            email: payload.email,
            website: payload.website,
            tax_id: payload.tax_id,
            logo: payload.logo,
            tip_percentage: payload.tip_percentage,
            tip_enabled: payload.tip_enabled,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(company)))
}

// PUT /api/company
#[utoipa::path(
    put,
    path = "/api/company",
    tag = "Company",
    request_body = UpdateCompanyPayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = Company),
        (status = 400, description = "id ausente no corpo"),
        (status = 404, description = "Perfil não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company_id = payload
        .id
        .ok_or_else(|| AppError::MissingFields("id".to_string()))?;

    let company = app_state
        .company_service
        .update_company(
            company_id,
            CompanyUpdate {
                name: payload.name,
                address: payload.address,
                phone: payload.phone,
                email: payload.email,
                website: payload.website,
                tax_id: payload.tax_id,
                logo: payload.logo,
                tip_percentage: payload.tip_percentage,
                tip_enabled: payload.tip_enabled,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(company)))
}

// PUT /api/company/tip
#[utoipa::path(
    put,
    path = "/api/company/tip",
    tag = "Company",
    request_body = TipSettingsPayload,
    responses(
        (status = 200, description = "Configuração de gorjeta atualizada", body = Company),
        (status = 404, description = "Perfil não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tip_settings(
    State(app_state): State<AppState>,
    Json(payload): Json<TipSettingsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state
        .company_service
        .update_tip_settings(payload.company_id, payload.tip_percentage, payload.tip_enabled)
        .await?;

    Ok((StatusCode::OK, Json(company)))
}
