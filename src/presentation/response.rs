use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    config::Environment,
    domain::{
        error::FieldErrors,
        models::registration::{Course, Registration, Timestamp},
    },
};

pub const PERMISSION_DENIED_NOTICE: &str = "You do not have permission to perform this action.";

/// Key for errors that belong to the whole form rather than one field
pub const FORM_ERROR_KEY: &str = "_form";

/// Outcome of a create or delete, as the portal UI expects it
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationResponse>,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
            registration: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::ok(message)
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_form_error(self, reason: String) -> Self {
        self.with_errors(FieldErrors::from([(FORM_ERROR_KEY.to_string(), vec![reason])]))
    }

    pub fn with_registration(mut self, registration: RegistrationResponse) -> Self {
        self.registration = Some(registration);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: String,
    pub full_name: String,
    pub department: String,
    pub matric_number: String,
    pub email: String,
    pub whatsapp_number: String,
    pub course: Course,
    pub receipt_url: String,
    pub timestamp: Timestamp,
    /// RFC 3339 rendering of `timestamp`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        let timestamp = registration.timestamp();
        Self {
            id: registration.id().to_string(),
            full_name: registration.full_name().to_string(),
            department: registration.department().to_string(),
            matric_number: registration.matric_number().to_string(),
            email: registration.email().to_string(),
            whatsapp_number: registration.whatsapp_number().to_string(),
            course: registration.course(),
            receipt_url: registration.receipt_url().to_string(),
            timestamp,
            created_at: timestamp.to_datetime().map(|datetime| datetime.to_rfc3339()),
        }
    }
}

/// Message shown to the caller for a permission failure. Production hides
/// the backend's diagnostic; development hands it back for debugging.
pub fn permission_message(detail: &str, environment: Environment) -> String {
    error!(detail, "backing store refused the operation");
    match environment {
        Environment::Production => PERMISSION_DENIED_NOTICE.to_string(),
        Environment::Development => format!("Permission denied: {detail}"),
    }
}

pub fn permission_denied(detail: &str, environment: Environment) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ActionResponse::failure(permission_message(detail, environment))),
    )
        .into_response()
}
