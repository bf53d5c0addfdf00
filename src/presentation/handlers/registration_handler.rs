use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    config::Environment,
    domain::{
        error::PipelineError,
        models::receipt::{MAX_RECEIPT_BYTES, ReceiptUpload},
        repositories::registration_repository::RegistrationRepository,
        services::{course_recommender::CourseRecommender, receipt_store::ReceiptStore},
        validation::RegistrationForm,
    },
    presentation::response::{ActionResponse, permission_denied},
    usecase::{
        recommend_course_usecase::{RecommendCourseError, RecommendCourseUsecase},
        register_student_usecase::{
            REGISTRATION_FAILURE_MESSAGE, REGISTRATION_SUCCESS_MESSAGE, RegisterStudentUsecase,
            VALIDATION_FAILED_MESSAGE,
        },
    },
};

/// Bytes kept from the receipt part. One past the limit is enough for
/// validation to reject it; the rest of the part is drained.
const RECEIPT_READ_CAP: usize = MAX_RECEIPT_BYTES + 1;

/// Longest text field accepted from the form
const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;

const RECEIPT_FIELD: &str = "receipt";

#[derive(Debug, Error)]
enum SubmissionError {
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("Field {0} is too long")]
    FieldTooLong(String),

    #[error("Field {0} is not valid UTF-8")]
    InvalidText(String),
}

impl SubmissionError {
    fn status(&self) -> StatusCode {
        match self {
            SubmissionError::Multipart(e) => e.status(),
            SubmissionError::FieldTooLong(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SubmissionError::InvalidText(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            SubmissionError::Multipart(e) => e.body_text(),
            other => other.to_string(),
        }
    }
}

// Request

#[derive(Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub interests: String,
}

// Response

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub course_recommendation: String,
    pub reasoning: String,
}

#[derive(Serialize, Deserialize)]
pub struct RecommendationErrorResponse {
    pub error: String,
}

/* Router Function and Handler Function */

/// Public student-facing routes. Suppose to be nested under `/api`.
pub fn create_registration_router<R, S, M>(
    register_service: RegisterStudentUsecase<R, S>,
    recommend_service: RecommendCourseUsecase<M>,
    environment: Environment,
) -> Router
where
    R: RegistrationRepository + 'static,
    S: ReceiptStore + 'static,
    M: CourseRecommender + 'static,
{
    let state = RegistrationState {
        register_service: Arc::new(register_service),
        recommend_service: Arc::new(recommend_service),
        environment,
    };

    Router::new()
        .route(
            "/registrations",
            post(register::<R, S, M>).layer(DefaultBodyLimit::disable()),
        )
        .route("/recommendations", post(recommend::<R, S, M>))
        .with_state(state)
}

pub struct RegistrationState<R: RegistrationRepository, S: ReceiptStore, M: CourseRecommender> {
    register_service: Arc<RegisterStudentUsecase<R, S>>,
    recommend_service: Arc<RecommendCourseUsecase<M>>,
    environment: Environment,
}

impl<R: RegistrationRepository, S: ReceiptStore, M: CourseRecommender> Clone
    for RegistrationState<R, S, M>
{
    fn clone(&self) -> Self {
        Self {
            register_service: Arc::clone(&self.register_service),
            recommend_service: Arc::clone(&self.recommend_service),
            environment: self.environment,
        }
    }
}

/// Read a part chunk by chunk, keeping at most `cap` bytes. Returns the kept
/// bytes and whether anything was dropped.
async fn read_capped(field: &mut Field<'_>, cap: usize) -> Result<(Vec<u8>, bool), MultipartError> {
    let mut kept = Vec::new();
    let mut truncated = false;

    while let Some(chunk) = field.chunk().await? {
        let room = cap - kept.len();
        if chunk.len() > room {
            kept.extend_from_slice(&chunk[..room]);
            truncated = true;
        } else {
            kept.extend_from_slice(&chunk);
        }
    }

    Ok((kept, truncated))
}

/// Split a multipart submission into the text fields and the receipt file.
/// Unknown parts are ignored.
async fn read_submission(
    mut multipart: Multipart,
) -> Result<(RegistrationForm, Option<ReceiptUpload>), SubmissionError> {
    let mut form = RegistrationForm::default();
    let mut receipt = None;

    while let Some(mut field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == RECEIPT_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let (bytes, truncated) = read_capped(&mut field, RECEIPT_READ_CAP).await?;
            if truncated {
                debug!(file_name = %file_name, "receipt over the size limit, rest of the part dropped");
            }
            receipt = Some(ReceiptUpload::new(file_name, content_type, bytes));
            continue;
        }

        let slot = match name.as_str() {
            "fullName" => &mut form.full_name,
            "department" => &mut form.department,
            "matricNumber" => &mut form.matric_number,
            "email" => &mut form.email,
            "whatsappNumber" => &mut form.whatsapp_number,
            "course" => &mut form.course,
            _ => continue,
        };
        let (bytes, truncated) = read_capped(&mut field, MAX_TEXT_FIELD_BYTES).await?;
        if truncated {
            return Err(SubmissionError::FieldTooLong(name));
        }
        *slot = String::from_utf8(bytes).map_err(|_| SubmissionError::InvalidText(name))?;
    }

    Ok((form, receipt))
}

/// handler function for student registration
async fn register<R: RegistrationRepository, S: ReceiptStore, M: CourseRecommender>(
    State(state): State<RegistrationState<R, S, M>>,
    multipart: Multipart,
) -> Response {
    let (form, receipt) = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            warn!(error = %e, "unreadable registration submission");
            return (e.status(), Json(ActionResponse::failure(e.message()))).into_response();
        }
    };

    match state.register_service.register(form, receipt).await {
        Ok(registration) => (
            StatusCode::CREATED,
            Json(
                ActionResponse::ok(REGISTRATION_SUCCESS_MESSAGE)
                    .with_registration(registration.into()),
            ),
        )
            .into_response(),
        Err(PipelineError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ActionResponse::failure(VALIDATION_FAILED_MESSAGE).with_errors(errors)),
        )
            .into_response(),
        Err(PipelineError::PermissionDenied(detail)) => {
            permission_denied(&detail, state.environment)
        }
        Err(PipelineError::Transient(reason)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ActionResponse::failure(REGISTRATION_FAILURE_MESSAGE).with_form_error(reason)),
        )
            .into_response(),
    }
}

/// handler function for course recommendation
async fn recommend<R: RegistrationRepository, S: ReceiptStore, M: CourseRecommender>(
    State(state): State<RegistrationState<R, S, M>>,
    Json(payload): Json<RecommendationRequest>,
) -> Response {
    match state.recommend_service.recommend(&payload.interests).await {
        Ok(recommendation) => (
            StatusCode::OK,
            Json(RecommendationResponse {
                course_recommendation: recommendation.course_recommendation,
                reasoning: recommendation.reasoning,
            }),
        )
            .into_response(),
        Err(e) => {
            let status = match e {
                RecommendCourseError::InsufficientDetail => StatusCode::BAD_REQUEST,
                RecommendCourseError::Unavailable => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(RecommendationErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
