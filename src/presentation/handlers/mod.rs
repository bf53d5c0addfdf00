pub mod admin_handler;
pub mod auth_handler;
pub mod receipt_handler;
pub mod registration_handler;
