use tracing::info;

use crate::domain::{
    error::DomainError,
    models::admin::Admin,
    repositories::credential_repository::CredentialRepository,
    services::password_service::PasswordHasher,
};

/// Makes sure the configured admin account exists
pub struct ProvisionAdminUsecase<C: CredentialRepository, P: PasswordHasher> {
    credential_repository: C,
    password_hasher: P,
}

impl<C: CredentialRepository, P: PasswordHasher> ProvisionAdminUsecase<C, P> {
    pub fn new(credential_repository: C, password_hasher: P) -> Self {
        Self {
            credential_repository,
            password_hasher,
        }
    }

    /// Create the admin unless one with this email already exists.
    /// An existing account keeps its current password.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<Admin, DomainError> {
        let email = email.trim();
        if let Some(existing) = self.credential_repository.find_by_email(email).await? {
            return Ok(existing.admin().clone());
        }

        let password_hash = self.password_hasher.hash(password)?;
        let admin = self
            .credential_repository
            .create_admin(email, password_hash)
            .await?;
        info!(admin_id = %admin.id(), email, "admin account provisioned");

        Ok(admin)
    }
}
