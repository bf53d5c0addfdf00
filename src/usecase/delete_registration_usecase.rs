use tracing::{error, info};

use crate::domain::{
    error::{PipelineError, RepositoryError, StorageError},
    models::registration::RegistrationId,
    repositories::registration_repository::RegistrationRepository,
    services::receipt_store::ReceiptStore,
};

pub const DELETE_SUCCESS_MESSAGE: &str = "Registration deleted successfully.";

/// Remove the stored receipt, then the registration document.
///
/// A receipt that is already gone does not stop the delete. Any other
/// storage failure aborts before the document is touched. Runs once per
/// call; there is no retry.
pub struct DeleteRegistrationUsecase<R: RegistrationRepository, S: ReceiptStore> {
    registration_repository: R,
    receipt_store: S,
}

impl<R: RegistrationRepository, S: ReceiptStore> DeleteRegistrationUsecase<R, S> {
    pub fn new(registration_repository: R, receipt_store: S) -> Self {
        Self {
            registration_repository,
            receipt_store,
        }
    }

    pub async fn delete(&self, id: RegistrationId, receipt_url: &str) -> Result<(), PipelineError> {
        if !receipt_url.is_empty() {
            match self.receipt_store.delete(receipt_url).await {
                Ok(()) => {}
                Err(StorageError::NotFound) => {
                    info!(id = %id, receipt_url, "receipt already absent, continuing delete");
                }
                Err(e) => {
                    error!(id = %id, receipt_url, error = %e, "receipt delete failed, keeping registration");
                    return Err(e.into());
                }
            }
        }

        match self.registration_repository.delete(id).await {
            Ok(()) => {
                info!(id = %id, "registration deleted");
                Ok(())
            }
            // Someone else got there first
            Err(RepositoryError::NotFound) => {
                info!(id = %id, "registration already deleted");
                Ok(())
            }
            Err(e) => {
                error!(id = %id, error = %e, "registration delete failed");
                Err(e.into())
            }
        }
    }
}

/// Message shown when a delete fails
pub fn delete_failure_message(error: &PipelineError) -> String {
    format!("Deletion failed: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::services::receipt_store::ReceiptStore,
        testing::{
            FakeFailure, InMemoryReceiptStore, InMemoryRegistrationRepository, jane_doe_form,
            pdf_receipt,
        },
        usecase::register_student_usecase::RegisterStudentUsecase,
    };

    async fn seeded() -> (InMemoryRegistrationRepository, InMemoryReceiptStore, RegistrationId, String) {
        let repository = InMemoryRegistrationRepository::new();
        let store = InMemoryReceiptStore::new();
        let registration = RegisterStudentUsecase::new(repository.clone(), store.clone())
            .register(jane_doe_form(), Some(pdf_receipt(64)))
            .await
            .unwrap();
        (
            repository,
            store,
            registration.id(),
            registration.receipt_url().to_string(),
        )
    }

    #[tokio::test]
    async fn removes_receipt_and_document() {
        let (repository, store, id, url) = seeded().await;
        let usecase = DeleteRegistrationUsecase::new(repository.clone(), store.clone());

        usecase.delete(id, &url).await.unwrap();

        assert_eq!(repository.len(), 0);
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn missing_receipt_still_deletes_document() {
        let (repository, store, id, url) = seeded().await;
        store.delete(&url).await.unwrap();
        let usecase = DeleteRegistrationUsecase::new(repository.clone(), store);

        usecase.delete(id, &url).await.unwrap();

        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn empty_receipt_url_skips_storage() {
        let (repository, _, id, _) = seeded().await;
        let store = InMemoryReceiptStore::failing(FakeFailure::Transient);
        let usecase = DeleteRegistrationUsecase::new(repository.clone(), store);

        usecase.delete(id, "").await.unwrap();

        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn storage_failure_keeps_document() {
        let (repository, _, id, url) = seeded().await;
        let store = InMemoryReceiptStore::failing(FakeFailure::Transient);
        let usecase = DeleteRegistrationUsecase::new(repository.clone(), store);

        let error = usecase.delete(id, &url).await.unwrap_err();

        assert!(matches!(error, PipelineError::Transient(_)));
        assert!(delete_failure_message(&error).starts_with("Deletion failed: "));
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn deleting_twice_succeeds() {
        let (repository, store, id, url) = seeded().await;
        let usecase = DeleteRegistrationUsecase::new(repository.clone(), store);

        usecase.delete(id, &url).await.unwrap();
        usecase.delete(id, &url).await.unwrap();

        assert_eq!(repository.len(), 0);
    }
}
