use tracing::{info, warn};

use crate::domain::{
    error::DomainError,
    models::admin::Admin,
    repositories::credential_repository::CredentialRepository,
    services::{password_service::PasswordHasher, token_service::TokenGenerator},
};

#[derive(Debug)]
pub struct LoginResult {
    pub token: String,
    pub admin: Admin,
}

/// Admin sign-in against the stored credentials
pub struct LoginUsecase<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator> {
    credential_repository: C,
    password_hasher: P,
    token_generator: T,
}

impl<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator> LoginUsecase<C, P, T> {
    pub fn new(credential_repository: C, password_hasher: P, token_generator: T) -> Self {
        Self {
            credential_repository,
            password_hasher,
            token_generator,
        }
    }

    pub async fn login(&self, email: String, password: String) -> Result<LoginResult, DomainError> {
        let email = email.trim();

        // unknown email and wrong password look the same to the caller
        let Some(credential) = self.credential_repository.find_by_email(email).await? else {
            warn!(email, "sign-in for unknown admin");
            return Err(DomainError::AuthenticationFailed);
        };

        if !self
            .password_hasher
            .verify(&password, credential.password_hash())?
        {
            warn!(email, "sign-in with wrong password");
            return Err(DomainError::AuthenticationFailed);
        }

        let admin = credential.admin().clone();
        let token = self.token_generator.generate(&admin)?;
        info!(admin_id = %admin.id(), "admin signed in");

        Ok(LoginResult { token, admin })
    }
}
