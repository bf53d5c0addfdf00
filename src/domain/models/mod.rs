pub mod admin;
pub mod receipt;
pub mod registration;
pub mod registration_filter;
