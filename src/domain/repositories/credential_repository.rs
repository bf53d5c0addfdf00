use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::admin::{Admin, AdminCredential, HashedPassword},
};

#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminCredential>, RepositoryError>;

    async fn create_admin(
        &self,
        email: &str,
        password_hash: HashedPassword,
    ) -> Result<Admin, RepositoryError>;
}
