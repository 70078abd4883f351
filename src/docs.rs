// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::signin,
        handlers::auth::get_me,

        // --- Company ---
        handlers::company::get_company,
        handlers::company::create_company,
        handlers::company::update_company,
        handlers::company::update_tip_settings,

        // --- Invoices ---
        handlers::invoices::list_invoices,
        handlers::invoices::create_invoice,
        handlers::invoices::invoice_stats,
        handlers::invoices::get_invoice,
        handlers::invoices::replace_invoice,
        handlers::invoices::delete_invoice,
        handlers::invoices::update_invoice_status,
        handlers::invoices::add_invoice_item,
        handlers::invoices::update_invoice_item,
        handlers::invoices::remove_invoice_item,
        handlers::invoices::invoice_balance,
        handlers::invoices::invoice_notes,

        // --- Notes ---
        handlers::notes::list_notes,
        handlers::notes::create_note,
        handlers::notes::get_note,
        handlers::notes::update_note,
        handlers::notes::delete_note,
        handlers::notes::add_note_item,
        handlers::notes::update_note_item,
        handlers::notes::remove_note_item,
    ),
    components(
        schemas(
            models::money::Money,
            models::item::LineItem,
            models::item::NewLineItem,
            models::client::IdentificationType,
            models::client::Client,
            models::client::ClientDraft,
            models::company::Company,
            models::invoice::Invoice,
            models::invoice::InvoiceStatus,
            models::invoice::InvoiceStats,
            models::note::Note,
            models::note::NoteType,
            models::note::NoteReason,
            models::note::InvoiceBalance,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            handlers::company::CreateCompanyPayload,
            handlers::company::UpdateCompanyPayload,
            handlers::company::TipSettingsPayload,
            handlers::invoices::CreateInvoicePayload,
            handlers::invoices::ReplaceInvoicePayload,
            handlers::invoices::UpdateStatusPayload,
            handlers::notes::CreateNotePayload,
            handlers::notes::UpdateNotePayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registro e login de usuários"),
        (name = "Company", description = "Perfil da empresa emissora"),
        (name = "Invoices", description = "Faturas, itens e estatísticas"),
        (name = "Notes", description = "Notas crédito/débito e saldo de faturas")
    ),
    info(
        title = "Facturas API",
        description = "Backend de faturamento para pequenos negócios: faturas, notas crédito/débito e perfil da empresa."
    )
)]
pub struct ApiDoc;

// Registra o esquema Bearer JWT usado pelas rotas protegidas
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
