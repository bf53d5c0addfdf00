use tracing::{debug, error};

use crate::domain::{
    error::PipelineError,
    models::{
        registration::Registration,
        registration_filter::{RegistrationFilter, department_options},
    },
    repositories::registration_repository::RegistrationRepository,
};

pub const LIST_FAILURE_MESSAGE: &str = "Could not retrieve registration data from the database.";

#[derive(Debug)]
pub struct RegistrationListing {
    /// Filtered registrations, most recent first
    pub registrations: Vec<Registration>,
    /// Department filter options drawn from the unfiltered set
    pub departments: Vec<String>,
}

pub struct ListRegistrationsUsecase<R: RegistrationRepository> {
    registration_repository: R,
}

impl<R: RegistrationRepository> ListRegistrationsUsecase<R> {
    pub fn new(registration_repository: R) -> Self {
        Self {
            registration_repository,
        }
    }

    /// Fetch everything, then filter in memory.
    ///
    /// Fine for an event-sized dataset; there is no pagination or query
    /// pushdown.
    pub async fn list(&self, filter: &RegistrationFilter) -> Result<RegistrationListing, PipelineError> {
        let all = self
            .registration_repository
            .list_recent()
            .await
            .map_err(|e| {
                error!(error = %e, "failed to fetch registrations");
                PipelineError::from(e)
            })?;

        let departments = department_options(&all);
        let total = all.len();
        let registrations = filter.apply(all);
        debug!(total, kept = registrations.len(), ?filter, "registrations listed");

        Ok(RegistrationListing {
            registrations,
            departments,
        })
    }
}
