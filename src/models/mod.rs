pub mod auth;
pub mod client;
pub mod company;
pub mod invoice;
pub mod item;
pub mod money;
pub mod note;
