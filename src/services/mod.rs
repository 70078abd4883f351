pub mod auth;
pub mod company_service;
pub mod invoice_service;
pub mod note_service;
