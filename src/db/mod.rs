// src/db/mod.rs

// Interfaces de persistência. O núcleo de domínio só enxerga estes
// traits; quem decide a implementação (Postgres ou memória) é a
// montagem do AppState. Injeção explícita via construtor, nada de
// registro global.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        company::Company,
        invoice::Invoice,
        note::{Note, NoteType},
    },
};

pub mod company_repo;
pub mod invoice_repo;
pub mod memory;
pub mod note_repo;
pub mod user_repo;

pub use company_repo::PgCompanyRepository;
pub use invoice_repo::PgInvoiceRepository;
pub use memory::{
    InMemoryCompanyRepository, InMemoryInvoiceRepository, InMemoryNoteRepository,
    InMemoryUserRepository,
};
pub use note_repo::PgNoteRepository;
pub use user_repo::PgUserRepository;

pub type DynCompanyRepository = Arc<dyn CompanyRepository>;
pub type DynInvoiceRepository = Arc<dyn InvoiceRepository>;
pub type DynNoteRepository = Arc<dyn NoteRepository>;
pub type DynUserRepository = Arc<dyn UserRepository>;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn save(&self, company: &Company) -> Result<Company, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError>;
    /// O perfil é singleton: "a" empresa é a primeira encontrada.
    async fn find_first(&self) -> Result<Option<Company>, AppError>;
    async fn update(&self, company: &Company) -> Result<Company, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn save(&self, invoice: &Invoice) -> Result<Invoice, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, AppError>;
    async fn find_all(&self) -> Result<Vec<Invoice>, AppError>;
    async fn find_recent(&self, limit: i64) -> Result<Vec<Invoice>, AppError>;
    async fn update(&self, invoice: &Invoice) -> Result<Invoice, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn save(&self, note: &Note) -> Result<Note, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, AppError>;
    async fn find_all(&self) -> Result<Vec<Note>, AppError>;
    async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<Note>, AppError>;
    async fn find_by_type(&self, note_type: NoteType) -> Result<Vec<Note>, AppError>;
    async fn update(&self, note: &Note) -> Result<Note, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}
