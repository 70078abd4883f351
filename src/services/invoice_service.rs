// src/services/invoice_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DynCompanyRepository, DynInvoiceRepository},
    models::{
        client::Client,
        invoice::{Invoice, InvoiceStats, InvoiceStatus},
        item::{LineItem, NewLineItem},
        money::Money,
    },
};

// Operações de fatura. O serviço carrega a entidade, aplica a mutação
// de domínio (que recalcula os totais) e devolve ao repositório. Toda
// a aritmética acontece em memória, a persistência é colaborador.
#[derive(Clone)]
pub struct InvoiceService {
    invoices: DynInvoiceRepository,
    companies: DynCompanyRepository,
}

impl InvoiceService {
    pub fn new(invoices: DynInvoiceRepository, companies: DynCompanyRepository) -> Self {
        Self {
            invoices,
            companies,
        }
    }

    /// Cria uma fatura em rascunho com um SNAPSHOT do perfil atual da
    /// empresa. Sem perfil configurado, falha com a pré-condição.
    pub async fn create_invoice(&self, client: Option<Client>) -> Result<Invoice, AppError> {
        let company = self
            .companies
            .find_first()
            .await?
            .filter(|c| c.is_complete())
            .ok_or(AppError::CompanyNotConfigured)?;

        let invoice = Invoice::new(company, client);
        self.invoices.save(&invoice).await
    }

    pub async fn add_item(
        &self,
        invoice_id: Uuid,
        description: &str,
        quantity: Decimal,
        unit_price: Money,
    ) -> Result<Invoice, AppError> {
        let mut invoice = self.require(invoice_id).await?;

        invoice.add_item(LineItem::new(description, quantity, unit_price))?;
        self.invoices.update(&invoice).await
    }

    pub async fn update_item(
        &self,
        invoice_id: Uuid,
        item_id: Uuid,
        description: &str,
        quantity: Decimal,
        unit_price: Money,
    ) -> Result<Invoice, AppError> {
        let mut invoice = self.require(invoice_id).await?;

        invoice.update_item(item_id, description, quantity, unit_price)?;
        self.invoices.update(&invoice).await
    }

    pub async fn remove_item(&self, invoice_id: Uuid, item_id: Uuid) -> Result<Invoice, AppError> {
        let mut invoice = self.require(invoice_id).await?;

        invoice.remove_item(item_id)?;
        self.invoices.update(&invoice).await
    }

    pub async fn set_client(
        &self,
        invoice_id: Uuid,
        client: Option<Client>,
    ) -> Result<Invoice, AppError> {
        let mut invoice = self.require(invoice_id).await?;

        invoice.set_client(client);
        self.invoices.update(&invoice).await
    }

    /// Transição de estado com a guarda de conclusão reavaliada ao vivo.
    pub async fn update_status(
        &self,
        invoice_id: Uuid,
        status: InvoiceStatus,
    ) -> Result<Invoice, AppError> {
        let mut invoice = self.require(invoice_id).await?;

        invoice.set_status(status)?;
        self.invoices.update(&invoice).await
    }

    /// Substituição completa (PUT): troca cliente, reconstrói a lista
    /// de itens do zero e aplica notas, vencimento e estado.
    pub async fn replace_invoice(
        &self,
        invoice_id: Uuid,
        client: Option<Client>,
        items: Vec<NewLineItem>,
        notes: Option<String>,
        due_date: Option<DateTime<Utc>>,
        status: InvoiceStatus,
    ) -> Result<Invoice, AppError> {
        let mut invoice = self.require(invoice_id).await?;

        invoice.set_client(client);
        invoice.items = items.into_iter().map(Into::into).collect();
        // Recalcula sempre, mesmo com a lista vazia (totais zerados)
        invoice.calculate_totals()?;
        invoice.notes = notes;
        invoice.due_date = due_date;
        invoice.set_status(status)?;

        self.invoices.update(&invoice).await
    }

    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Invoice, AppError> {
        self.require(invoice_id).await
    }

    pub async fn get_all_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        self.invoices.find_all().await
    }

    pub async fn get_recent_invoices(&self, limit: i64) -> Result<Vec<Invoice>, AppError> {
        self.invoices.find_recent(limit).await
    }

    pub async fn delete_invoice(&self, invoice_id: Uuid) -> Result<(), AppError> {
        self.require(invoice_id).await?;
        self.invoices.delete(invoice_id).await
    }

    pub async fn stats(&self) -> Result<InvoiceStats, AppError> {
        let invoices = self.invoices.find_all().await?;
        Ok(InvoiceStats::from_invoices(&invoices, Utc::now()))
    }

    async fn require(&self, invoice_id: Uuid) -> Result<Invoice, AppError> {
        self.invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{CompanyRepository, InMemoryCompanyRepository, InMemoryInvoiceRepository},
        models::company::{Company, NewCompany},
        services::company_service::CompanyService,
    };
    use std::sync::Arc;

    fn cop(amount: i64) -> Money {
        Money::new(Decimal::new(amount, 0), "COP")
    }

    fn nova_empresa(tip_enabled: bool, tip_percentage: i64) -> NewCompany {
        NewCompany {
            name: "La Espiga".into(),
            address: None,
            phone: None,
            email: None,
            website: None,
            tax_id: None,
            logo: None,
            tip_percentage: Some(Decimal::new(tip_percentage, 0)),
            tip_enabled: Some(tip_enabled),
        }
    }

    async fn setup(tip_enabled: bool, tip_percentage: i64) -> InvoiceService {
        let companies = Arc::new(InMemoryCompanyRepository::default());
        companies
            .save(&Company::new(nova_empresa(tip_enabled, tip_percentage)))
            .await
            .unwrap();

        InvoiceService::new(Arc::new(InMemoryInvoiceRepository::default()), companies)
    }

    #[tokio::test]
    async fn criar_fatura_sem_empresa_falha_com_precondicao() {
        let service = InvoiceService::new(
            Arc::new(InMemoryInvoiceRepository::default()),
            Arc::new(InMemoryCompanyRepository::default()),
        );

        let err = service.create_invoice(None).await.unwrap_err();
        assert!(matches!(err, AppError::CompanyNotConfigured));
    }

    // Fluxo de ponta a ponta do exemplo da regra de negócio.
    #[tokio::test]
    async fn fluxo_completo_com_gorjeta_de_10_por_cento() {
        let service = setup(true, 10).await;

        let invoice = service.create_invoice(None).await.unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Draft);

        service
            .add_item(invoice.id, "A", Decimal::new(2, 0), cop(1000))
            .await
            .unwrap();
        let invoice = service
            .add_item(invoice.id, "B", Decimal::new(1, 0), cop(500))
            .await
            .unwrap();

        assert_eq!(invoice.subtotal.amount, Decimal::new(2500, 0));
        assert_eq!(invoice.tip_amount.amount, Decimal::new(250, 0));
        assert_eq!(invoice.total.amount, Decimal::new(2750, 0));

        let invoice = service
            .update_status(invoice.id, InvoiceStatus::Completed)
            .await
            .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Completed);
    }

    #[tokio::test]
    async fn concluir_fatura_vazia_falha_e_estado_fica_como_estava() {
        let service = setup(true, 10).await;
        let invoice = service.create_invoice(None).await.unwrap();

        let err = service
            .update_status(invoice.id, InvoiceStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CannotComplete));

        let invoice = service.get_invoice(invoice.id).await.unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Draft);
    }

    #[tokio::test]
    async fn snapshot_da_empresa_nao_acompanha_o_perfil() {
        let companies = Arc::new(InMemoryCompanyRepository::default());
        let company_service = CompanyService::new(companies.clone());
        let created = company_service
            .create_company(nova_empresa(true, 10))
            .await
            .unwrap();

        let service =
            InvoiceService::new(Arc::new(InMemoryInvoiceRepository::default()), companies);
        let invoice = service.create_invoice(None).await.unwrap();

        // Muda o perfil DEPOIS de criada a fatura
        company_service
            .update_tip_settings(created.id, Decimal::new(50, 0), true)
            .await
            .unwrap();

        let invoice = service
            .add_item(invoice.id, "A", Decimal::new(1, 0), cop(1000))
            .await
            .unwrap();

        // O cálculo continua usando o snapshot de 10%
        assert_eq!(invoice.tip_amount.amount, Decimal::new(100, 0));
    }

    #[tokio::test]
    async fn operacoes_sobre_fatura_inexistente_falham() {
        let service = setup(true, 10).await;
        let missing = Uuid::new_v4();

        assert!(matches!(
            service
                .add_item(missing, "A", Decimal::ONE, cop(100))
                .await
                .unwrap_err(),
            AppError::InvoiceNotFound
        ));
        assert!(matches!(
            service.get_invoice(missing).await.unwrap_err(),
            AppError::InvoiceNotFound
        ));
        assert!(matches!(
            service.delete_invoice(missing).await.unwrap_err(),
            AppError::InvoiceNotFound
        ));
    }

    #[tokio::test]
    async fn atualizar_item_inexistente_falha() {
        let service = setup(true, 10).await;
        let invoice = service.create_invoice(None).await.unwrap();

        let err = service
            .update_item(invoice.id, Uuid::new_v4(), "X", Decimal::ONE, cop(100))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ItemNotFound));
    }

    #[tokio::test]
    async fn substituicao_completa_reconstroi_os_itens() {
        let service = setup(false, 0).await;
        let invoice = service.create_invoice(None).await.unwrap();
        service
            .add_item(invoice.id, "velho", Decimal::new(9, 0), cop(999))
            .await
            .unwrap();

        let replaced = service
            .replace_invoice(
                invoice.id,
                None,
                vec![NewLineItem {
                    description: "nuevo".into(),
                    quantity: Decimal::new(2, 0),
                    unit_price: cop(100),
                }],
                Some("entrega".into()),
                None,
                InvoiceStatus::Pending,
            )
            .await
            .unwrap();

        assert_eq!(replaced.items.len(), 1);
        assert_eq!(replaced.items[0].description, "nuevo");
        assert_eq!(replaced.subtotal.amount, Decimal::new(200, 0));
        assert_eq!(replaced.status, InvoiceStatus::Pending);
        assert_eq!(replaced.notes.as_deref(), Some("entrega"));
    }

    #[tokio::test]
    async fn substituicao_com_lista_vazia_zera_os_totais() {
        let service = setup(true, 10).await;
        let invoice = service.create_invoice(None).await.unwrap();
        service
            .add_item(invoice.id, "A", Decimal::new(2, 0), cop(1000))
            .await
            .unwrap();

        let replaced = service
            .replace_invoice(invoice.id, None, Vec::new(), None, None, InvoiceStatus::Draft)
            .await
            .unwrap();

        assert!(replaced.items.is_empty());
        assert!(replaced.subtotal.is_zero());
        assert!(replaced.tip_amount.is_zero());
        assert!(replaced.total.is_zero());
    }

    #[tokio::test]
    async fn substituicao_que_conclui_sem_itens_validos_falha() {
        let service = setup(false, 0).await;
        let invoice = service.create_invoice(None).await.unwrap();

        let err = service
            .replace_invoice(
                invoice.id,
                None,
                Vec::new(),
                None,
                None,
                InvoiceStatus::Completed,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CannotComplete));
    }

    #[tokio::test]
    async fn recentes_respeitam_o_limite() {
        let service = setup(false, 0).await;
        for _ in 0..5 {
            service.create_invoice(None).await.unwrap();
        }

        let recent = service.get_recent_invoices(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(service.get_all_invoices().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn stats_refletem_o_conjunto_de_faturas() {
        let service = setup(false, 0).await;

        let completed = service.create_invoice(None).await.unwrap();
        service
            .add_item(completed.id, "A", Decimal::ONE, cop(1000))
            .await
            .unwrap();
        service
            .update_status(completed.id, InvoiceStatus::Completed)
            .await
            .unwrap();

        let pending = service.create_invoice(None).await.unwrap();
        service
            .update_status(pending.id, InvoiceStatus::Pending)
            .await
            .unwrap();

        service.create_invoice(None).await.unwrap(); // rascunho

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_invoices, 3);
        assert_eq!(stats.completed_invoices, 1);
        assert_eq!(stats.pending_invoices, 1);
        assert_eq!(stats.total_revenue, Decimal::new(1000, 0));
    }
}
