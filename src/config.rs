// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        DynCompanyRepository, DynInvoiceRepository, DynNoteRepository, DynUserRepository,
        InMemoryCompanyRepository, InMemoryInvoiceRepository, InMemoryNoteRepository,
        InMemoryUserRepository, PgCompanyRepository, PgInvoiceRepository, PgNoteRepository,
        PgUserRepository,
    },
    services::{
        auth::AuthService, company_service::CompanyService, invoice_service::InvoiceService,
        note_service::NoteService,
    },
};

#[derive(Clone)]
pub struct AppState {
    // None quando rodando com o backend em memória
    pub db_pool: Option<PgPool>,
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub invoice_service: InvoiceService,
    pub note_service: NoteService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definida")?;

        // Com DATABASE_URL usamos Postgres; sem ela, repositórios em
        // memória (útil em desenvolvimento e nos testes de fumaça).
        let (db_pool, companies, invoices, notes, users): (
            Option<PgPool>,
            DynCompanyRepository,
            DynInvoiceRepository,
            DynNoteRepository,
            DynUserRepository,
        ) = match env::var("DATABASE_URL") {
            Ok(database_url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(&database_url)
                    .await?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                (
                    Some(pool.clone()),
                    Arc::new(PgCompanyRepository::new(pool.clone())) as DynCompanyRepository,
                    Arc::new(PgInvoiceRepository::new(pool.clone())) as DynInvoiceRepository,
                    Arc::new(PgNoteRepository::new(pool.clone())) as DynNoteRepository,
                    Arc::new(PgUserRepository::new(pool)) as DynUserRepository,
                )
            }
            Err(_) => {
                tracing::warn!(
                    "DATABASE_URL não definida; usando repositórios em memória (dados voláteis)"
                );

                (
                    None,
                    Arc::new(InMemoryCompanyRepository::default()) as DynCompanyRepository,
                    Arc::new(InMemoryInvoiceRepository::default()) as DynInvoiceRepository,
                    Arc::new(InMemoryNoteRepository::default()) as DynNoteRepository,
                    Arc::new(InMemoryUserRepository::default()) as DynUserRepository,
                )
            }
        };

        // Monta o gráfico de dependências uma única vez
        let auth_service = AuthService::new(users, jwt_secret);
        let company_service = CompanyService::new(companies.clone());
        let invoice_service = InvoiceService::new(invoices.clone(), companies);
        let note_service = NoteService::new(notes, invoices);

        Ok(Self {
            db_pool,
            auth_service,
            company_service,
            invoice_service,
            note_service,
        })
    }
}
