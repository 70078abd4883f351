// src/db/memory.rs

// Repositórios em memória. Mesma interface dos repositórios Postgres;
// usados quando não há DATABASE_URL configurada e nos testes de serviço.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, InvoiceRepository, NoteRepository, UserRepository},
    models::{
        auth::User,
        company::Company,
        invoice::Invoice,
        note::{Note, NoteType},
    },
};

#[derive(Default)]
pub struct InMemoryCompanyRepository {
    rows: RwLock<HashMap<Uuid, Company>>,
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn save(&self, company: &Company) -> Result<Company, AppError> {
        self.rows
            .write()
            .await
            .insert(company.id, company.clone());
        Ok(company.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_first(&self) -> Result<Option<Company>, AppError> {
        let rows = self.rows.read().await;
        let mut companies: Vec<&Company> = rows.values().collect();
        companies.sort_by_key(|c| c.created_at);
        Ok(companies.first().map(|c| (*c).clone()))
    }

    async fn update(&self, company: &Company) -> Result<Company, AppError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&company.id) {
            return Err(AppError::CompanyNotFound);
        }
        rows.insert(company.id, company.clone());
        Ok(company.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    rows: RwLock<HashMap<Uuid, Invoice>>,
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn save(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        self.rows
            .write()
            .await
            .insert(invoice.id, invoice.clone());
        Ok(invoice.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Invoice>, AppError> {
        let mut invoices: Vec<Invoice> = self.rows.read().await.values().cloned().collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    async fn find_recent(&self, limit: i64) -> Result<Vec<Invoice>, AppError> {
        let mut invoices = self.find_all().await?;
        invoices.truncate(limit.max(0) as usize);
        Ok(invoices)
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&invoice.id) {
            return Err(AppError::InvoiceNotFound);
        }
        rows.insert(invoice.id, invoice.clone());
        Ok(invoice.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryNoteRepository {
    rows: RwLock<HashMap<Uuid, Note>>,
}

impl InMemoryNoteRepository {
    async fn filtered(&self, pred: impl Fn(&Note) -> bool) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .rows
            .read()
            .await
            .values()
            .filter(|n| pred(n))
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notes
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn save(&self, note: &Note) -> Result<Note, AppError> {
        self.rows.write().await.insert(note.id, note.clone());
        Ok(note.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Note>, AppError> {
        Ok(self.filtered(|_| true).await)
    }

    async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<Note>, AppError> {
        Ok(self.filtered(|n| n.invoice_id == invoice_id).await)
    }

    async fn find_by_type(&self, note_type: NoteType) -> Result<Vec<Note>, AppError> {
        Ok(self.filtered(|n| n.note_type == note_type).await)
    }

    async fn update(&self, note: &Note) -> Result<Note, AppError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&note.id) {
            return Err(AppError::NoteNotFound);
        }
        rows.insert(note.id, note.clone());
        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut rows = self.rows.write().await;
        if rows.values().any(|u| u.email == user.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        rows.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }
}
