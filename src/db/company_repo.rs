// src/db/company_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CompanyRepository,
    models::company::Company,
};

// Repositório do perfil da empresa, colunas escalares diretas.
#[derive(Clone)]
pub struct PgCompanyRepository {
    pool: PgPool,
}

impl PgCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn save(&self, company: &Company) -> Result<Company, AppError> {
        let saved = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies
                (id, name, address, phone, email, website, tax_id, logo,
                 tip_percentage, tip_enabled, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.phone)
        .bind(&company.email)
        .bind(&company.website)
        .bind(&company.tax_id)
        .bind(&company.logo)
        .bind(company.tip_percentage)
        .bind(company.tip_enabled)
        .bind(company.created_at)
        .bind(company.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    async fn find_first(&self) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    async fn update(&self, company: &Company) -> Result<Company, AppError> {
        let updated = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, address = $3, phone = $4, email = $5, website = $6,
                tax_id = $7, logo = $8, tip_percentage = $9, tip_enabled = $10,
                updated_at = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.phone)
        .bind(&company.email)
        .bind(&company.website)
        .bind(&company.tax_id)
        .bind(&company.logo)
        .bind(company.tip_percentage)
        .bind(company.tip_enabled)
        .bind(company.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CompanyNotFound)?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
