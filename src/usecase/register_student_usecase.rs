use tracing::{debug, error, info, warn};

use crate::domain::{
    error::PipelineError,
    models::{
        receipt::{ReceiptKey, ReceiptUpload},
        registration::Registration,
    },
    repositories::registration_repository::RegistrationRepository,
    services::receipt_store::ReceiptStore,
    validation::{RegistrationForm, validate_registration},
};

pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful!";
pub const REGISTRATION_FAILURE_MESSAGE: &str = "Database Error: Failed to register student.";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed. Please check your inputs.";

/// Validate → upload receipt → write registration document
pub struct RegisterStudentUsecase<R: RegistrationRepository, S: ReceiptStore> {
    registration_repository: R,
    receipt_store: S,
}

impl<R: RegistrationRepository, S: ReceiptStore> RegisterStudentUsecase<R, S> {
    pub fn new(registration_repository: R, receipt_store: S) -> Self {
        Self {
            registration_repository,
            receipt_store,
        }
    }

    pub async fn register(
        &self,
        form: RegistrationForm,
        receipt: Option<ReceiptUpload>,
    ) -> Result<Registration, PipelineError> {
        let submission = validate_registration(&form, receipt).map_err(|errors| {
            debug!(fields = ?errors.keys().collect::<Vec<_>>(), "registration rejected by validation");
            PipelineError::Validation(errors)
        })?;

        // Upload first: a failed upload must not leave a document behind
        let key = ReceiptKey::generate(submission.receipt.content_type());
        let receipt_url = self
            .receipt_store
            .put(&key, &submission.receipt)
            .await
            .map_err(|e| {
                error!(key = %key, file_name = submission.receipt.file_name(), error = %e, "receipt upload failed");
                PipelineError::from(e)
            })?;

        match self
            .registration_repository
            .create(&submission.record, &receipt_url)
            .await
        {
            Ok(registration) => {
                info!(
                    id = %registration.id(),
                    course = %registration.course(),
                    "registration created"
                );
                Ok(registration)
            }
            Err(e) => {
                // No compensating delete; the uploaded receipt is orphaned.
                warn!(receipt_url = %receipt_url, error = %e, "registration write failed after upload");
                Err(e.into())
            }
        }
    }
}
