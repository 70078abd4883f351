// src/services/company_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DynCompanyRepository,
    models::company::{Company, CompanyUpdate, NewCompany},
};

// Gestão do perfil (singleton) da empresa emissora.
#[derive(Clone)]
pub struct CompanyService {
    companies: DynCompanyRepository,
}

impl CompanyService {
    pub fn new(companies: DynCompanyRepository) -> Self {
        Self { companies }
    }

    pub async fn get_company(&self) -> Result<Option<Company>, AppError> {
        self.companies.find_first().await
    }

    pub async fn create_company(&self, data: NewCompany) -> Result<Company, AppError> {
        let company = Company::new(data);
        self.companies.save(&company).await
    }

    pub async fn update_company(
        &self,
        company_id: Uuid,
        updates: CompanyUpdate,
    ) -> Result<Company, AppError> {
        let mut company = self
            .companies
            .find_by_id(company_id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        company.apply(updates);
        self.companies.update(&company).await
    }

    pub async fn update_tip_settings(
        &self,
        company_id: Uuid,
        tip_percentage: Decimal,
        tip_enabled: bool,
    ) -> Result<Company, AppError> {
        let mut company = self
            .companies
            .find_by_id(company_id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        company.update_tip_settings(tip_percentage, tip_enabled);
        self.companies.update(&company).await
    }

    /// Pré-condição para emitir faturas: existe um perfil com nome.
    pub async fn has_company_data(&self) -> Result<bool, AppError> {
        Ok(self
            .get_company()
            .await?
            .map(|c| c.is_complete())
            .unwrap_or(false))
    }
}
