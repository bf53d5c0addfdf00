use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::registration::{NewRegistration, Registration, RegistrationId},
};

/// Document store holding submitted registrations
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Store a new registration; the store assigns its id and creation time
    async fn create(
        &self,
        registration: &NewRegistration,
        receipt_url: &str,
    ) -> Result<Registration, RepositoryError>;

    /// Every registration, most recent first
    async fn list_recent(&self) -> Result<Vec<Registration>, RepositoryError>;

    /// Remove a registration. `NotFound` when no document has this id.
    async fn delete(&self, id: RegistrationId) -> Result<(), RepositoryError>;
}
