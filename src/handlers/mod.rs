pub mod auth;
pub mod company;
pub mod invoices;
pub mod notes;
