use crate::domain::{error::DomainError, models::admin::Admin};

pub type Token = String;

/// Issues and checks admin session tokens
pub trait TokenGenerator: Send + Sync {
    fn generate(&self, admin: &Admin) -> Result<Token, DomainError>;

    /// The admin a still-valid token was issued to
    fn verify(&self, token: &str) -> Result<Admin, DomainError>;
}
