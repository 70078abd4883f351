// src/services/note_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DynInvoiceRepository, DynNoteRepository},
    models::{
        item::{LineItem, NewLineItem},
        money::Money,
        note::{InvoiceBalance, Note, NoteReason, NoteType},
    },
};

// Dados de criação de uma nota. A existência da fatura é verificada
// UMA vez, aqui. A nota é um documento independente dali em diante.
#[derive(Debug)]
pub struct NewNote {
    pub note_type: NoteType,
    pub invoice_id: Uuid,
    pub reason: NoteReason,
    pub reason_description: String,
    pub items: Vec<NewLineItem>,
}

// Atualização parcial de uma nota: só os campos presentes são
// aplicados; `items` presente substitui a lista inteira.
#[derive(Debug, Default)]
pub struct NoteUpdate {
    pub note_type: Option<NoteType>,
    pub reason: Option<NoteReason>,
    pub reason_description: Option<String>,
    pub items: Option<Vec<NewLineItem>>,
}

#[derive(Clone)]
pub struct NoteService {
    notes: DynNoteRepository,
    invoices: DynInvoiceRepository,
}

impl NoteService {
    pub fn new(notes: DynNoteRepository, invoices: DynInvoiceRepository) -> Self {
        Self { notes, invoices }
    }

    pub async fn create_note(&self, data: NewNote) -> Result<Note, AppError> {
        // Verifica que a fatura existe antes de emitir a nota
        self.invoices
            .find_by_id(data.invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;

        let mut note = Note::new(
            data.note_type,
            data.invoice_id,
            data.reason,
            &data.reason_description,
        );
        for item in data.items {
            note.add_item(item.into())?;
        }

        self.notes.save(&note).await
    }

    /// Edita tipo, motivo, descrição e/ou itens da nota. O número do
    /// documento não muda, mesmo quando o tipo muda.
    pub async fn update_note(&self, note_id: Uuid, updates: NoteUpdate) -> Result<Note, AppError> {
        let mut note = self.require(note_id).await?;

        if let Some(note_type) = updates.note_type {
            note.note_type = note_type;
        }
        if let Some(reason) = updates.reason {
            note.reason = reason;
        }
        if let Some(description) = updates.reason_description {
            note.reason_description = description;
        }
        if let Some(items) = updates.items {
            note.items = items.into_iter().map(Into::into).collect();
        }
        note.calculate_totals()?;

        self.notes.update(&note).await
    }

    pub async fn add_item(
        &self,
        note_id: Uuid,
        description: &str,
        quantity: Decimal,
        unit_price: Money,
    ) -> Result<Note, AppError> {
        let mut note = self.require(note_id).await?;

        note.add_item(LineItem::new(description, quantity, unit_price))?;
        self.notes.update(&note).await
    }

    pub async fn update_item(
        &self,
        note_id: Uuid,
        item_id: Uuid,
        description: &str,
        quantity: Decimal,
        unit_price: Money,
    ) -> Result<Note, AppError> {
        let mut note = self.require(note_id).await?;

        note.update_item(item_id, description, quantity, unit_price)?;
        self.notes.update(&note).await
    }

    pub async fn remove_item(&self, note_id: Uuid, item_id: Uuid) -> Result<Note, AppError> {
        let mut note = self.require(note_id).await?;

        note.remove_item(item_id)?;
        self.notes.update(&note).await
    }

    pub async fn get_note(&self, note_id: Uuid) -> Result<Note, AppError> {
        self.require(note_id).await
    }

    pub async fn get_all_notes(&self) -> Result<Vec<Note>, AppError> {
        self.notes.find_all().await
    }

    pub async fn get_notes_by_invoice(&self, invoice_id: Uuid) -> Result<Vec<Note>, AppError> {
        self.notes.find_by_invoice_id(invoice_id).await
    }

    pub async fn get_notes_by_type(&self, note_type: NoteType) -> Result<Vec<Note>, AppError> {
        self.notes.find_by_type(note_type).await
    }

    pub async fn delete_note(&self, note_id: Uuid) -> Result<(), AppError> {
        self.require(note_id).await?;
        self.notes.delete(note_id).await
    }

    /// Saldo efetivo da fatura: total original menos créditos mais
    /// débitos. A fatura em si nunca é alterada pelas notas.
    pub async fn invoice_balance(&self, invoice_id: Uuid) -> Result<InvoiceBalance, AppError> {
        let invoice = self
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;

        let notes = self.get_notes_by_invoice(invoice_id).await?;
        Ok(InvoiceBalance::calculate(invoice.total.amount, &notes))
    }

    async fn require(&self, note_id: Uuid) -> Result<Note, AppError> {
        self.notes
            .find_by_id(note_id)
            .await?
            .ok_or(AppError::NoteNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{
            CompanyRepository, InMemoryCompanyRepository, InMemoryInvoiceRepository,
            InMemoryNoteRepository,
        },
        models::company::{Company, NewCompany},
        services::invoice_service::InvoiceService,
    };
    use std::sync::Arc;

    fn cop(amount: i64) -> Money {
        Money::new(Decimal::new(amount, 0), "COP")
    }

    struct Fixture {
        notes: NoteService,
        invoices: InvoiceService,
    }

    async fn setup() -> Fixture {
        let companies = Arc::new(InMemoryCompanyRepository::default());
        companies
            .save(&Company::new(NewCompany {
                name: "La Espiga".into(),
                address: None,
                phone: None,
                email: None,
                website: None,
                tax_id: None,
                logo: None,
                tip_percentage: Some(Decimal::ZERO),
                tip_enabled: Some(false),
            }))
            .await
            .unwrap();

        let invoice_repo = Arc::new(InMemoryInvoiceRepository::default());
        Fixture {
            notes: NoteService::new(
                Arc::new(InMemoryNoteRepository::default()),
                invoice_repo.clone(),
            ),
            invoices: InvoiceService::new(invoice_repo, companies),
        }
    }

    fn nova_nota(note_type: NoteType, invoice_id: Uuid, amount: i64) -> NewNote {
        NewNote {
            note_type,
            invoice_id,
            reason: NoteReason::Other,
            reason_description: "ajuste".into(),
            items: vec![NewLineItem {
                description: "ajuste".into(),
                quantity: Decimal::ONE,
                unit_price: cop(amount),
            }],
        }
    }

    #[tokio::test]
    async fn nota_para_fatura_inexistente_falha() {
        let fx = setup().await;
        let err = fx
            .notes
            .create_note(nova_nota(NoteType::Credit, Uuid::new_v4(), 100))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvoiceNotFound));
    }

    // Caso canônico de saldo: 100.000 - 20.000 + 5.000.
    #[tokio::test]
    async fn saldo_final_combina_creditos_e_debitos() {
        let fx = setup().await;
        let invoice = fx.invoices.create_invoice(None).await.unwrap();
        fx.invoices
            .add_item(invoice.id, "venta", Decimal::ONE, cop(100_000))
            .await
            .unwrap();

        fx.notes
            .create_note(nova_nota(NoteType::Credit, invoice.id, 20_000))
            .await
            .unwrap();
        fx.notes
            .create_note(nova_nota(NoteType::Debit, invoice.id, 5_000))
            .await
            .unwrap();

        let balance = fx.notes.invoice_balance(invoice.id).await.unwrap();
        assert_eq!(balance.original_amount, Decimal::new(100_000, 0));
        assert_eq!(balance.credit_notes_total, Decimal::new(20_000, 0));
        assert_eq!(balance.debit_notes_total, Decimal::new(5_000, 0));
        assert_eq!(balance.final_balance, Decimal::new(85_000, 0));
    }

    // Livro-razão append-only: emitir notas não muta a fatura.
    #[tokio::test]
    async fn criar_nota_nao_altera_a_fatura_original() {
        let fx = setup().await;
        let invoice = fx.invoices.create_invoice(None).await.unwrap();
        let invoice = fx
            .invoices
            .add_item(invoice.id, "venta", Decimal::ONE, cop(100_000))
            .await
            .unwrap();
        let total_antes = invoice.total.amount;

        fx.notes
            .create_note(nova_nota(NoteType::Credit, invoice.id, 20_000))
            .await
            .unwrap();

        let depois = fx.invoices.get_invoice(invoice.id).await.unwrap();
        assert_eq!(depois.total.amount, total_antes);
        assert_eq!(depois.items.len(), 1);
    }

    #[tokio::test]
    async fn filtros_por_fatura_e_por_tipo() {
        let fx = setup().await;
        let a = fx.invoices.create_invoice(None).await.unwrap();
        let b = fx.invoices.create_invoice(None).await.unwrap();

        fx.notes
            .create_note(nova_nota(NoteType::Credit, a.id, 100))
            .await
            .unwrap();
        fx.notes
            .create_note(nova_nota(NoteType::Debit, a.id, 200))
            .await
            .unwrap();
        fx.notes
            .create_note(nova_nota(NoteType::Credit, b.id, 300))
            .await
            .unwrap();

        assert_eq!(fx.notes.get_notes_by_invoice(a.id).await.unwrap().len(), 2);
        assert_eq!(
            fx.notes
                .get_notes_by_type(NoteType::Credit)
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(fx.notes.get_all_notes().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn itens_da_nota_sao_editaveis_e_recalculam() {
        let fx = setup().await;
        let invoice = fx.invoices.create_invoice(None).await.unwrap();
        let note = fx
            .notes
            .create_note(nova_nota(NoteType::Credit, invoice.id, 100))
            .await
            .unwrap();
        let item_id = note.items[0].id;

        let note = fx
            .notes
            .update_item(note.id, item_id, "ajuste", Decimal::new(3, 0), cop(50))
            .await
            .unwrap();
        assert_eq!(note.total.amount, Decimal::new(150, 0));

        let note = fx.notes.remove_item(note.id, item_id).await.unwrap();
        assert!(note.total.is_zero());
    }

    #[tokio::test]
    async fn atualizar_nota_aplica_so_os_campos_presentes() {
        let fx = setup().await;
        let invoice = fx.invoices.create_invoice(None).await.unwrap();
        let note = fx
            .notes
            .create_note(nova_nota(NoteType::Credit, invoice.id, 100))
            .await
            .unwrap();
        let numero_antes = note.number.clone();

        let updated = fx
            .notes
            .update_note(
                note.id,
                NoteUpdate {
                    note_type: Some(NoteType::Debit),
                    reason: Some(NoteReason::AdditionalCharge),
                    reason_description: Some("flete".into()),
                    items: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.note_type, NoteType::Debit);
        assert_eq!(updated.reason, NoteReason::AdditionalCharge);
        assert_eq!(updated.reason_description, "flete");
        // Itens e número do documento intactos
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.number, numero_antes);
    }

    #[tokio::test]
    async fn atualizar_nota_com_itens_substitui_e_recalcula() {
        let fx = setup().await;
        let invoice = fx.invoices.create_invoice(None).await.unwrap();
        let note = fx
            .notes
            .create_note(nova_nota(NoteType::Credit, invoice.id, 100))
            .await
            .unwrap();

        let updated = fx
            .notes
            .update_note(
                note.id,
                NoteUpdate {
                    items: Some(vec![NewLineItem {
                        description: "nuevo ajuste".into(),
                        quantity: Decimal::new(2, 0),
                        unit_price: cop(250),
                    }]),
                    ..NoteUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.total.amount, Decimal::new(500, 0));

        // Lista vazia zera os totais
        let esvaziada = fx
            .notes
            .update_note(
                note.id,
                NoteUpdate {
                    items: Some(Vec::new()),
                    ..NoteUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(esvaziada.items.is_empty());
        assert!(esvaziada.total.is_zero());
    }

    #[tokio::test]
    async fn atualizar_nota_inexistente_falha() {
        let fx = setup().await;
        let err = fx
            .notes
            .update_note(Uuid::new_v4(), NoteUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoteNotFound));
    }

    #[tokio::test]
    async fn excluir_nota_inexistente_falha() {
        let fx = setup().await;
        let err = fx.notes.delete_note(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NoteNotFound));
    }
}
