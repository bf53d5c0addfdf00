use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::Environment,
    domain::{
        error::PipelineError,
        models::{
            admin::Admin,
            registration::RegistrationId,
            registration_filter::{CourseFilter, RegistrationFilter},
        },
        repositories::registration_repository::RegistrationRepository,
        services::{receipt_store::ReceiptStore, token_service::TokenGenerator},
    },
    presentation::{
        handlers::auth_handler::SESSION_COOKIE,
        response::{ActionResponse, RegistrationResponse, permission_denied},
    },
    usecase::{
        delete_registration_usecase::{
            DELETE_SUCCESS_MESSAGE, DeleteRegistrationUsecase, delete_failure_message,
        },
        list_registrations_usecase::{LIST_FAILURE_MESSAGE, ListRegistrationsUsecase},
    },
};

/// Where the UI sends an admin without a session
pub const LOGIN_PATH: &str = "/login";

// Request

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub course: Option<String>,
    pub department: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    #[serde(default)]
    pub receipt_url: String,
}

// Response

#[derive(Serialize, Deserialize)]
pub struct ListResponse {
    pub registrations: Vec<RegistrationResponse>,
    pub total: usize,
    pub departments: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct UnauthorizedResponse {
    pub error: String,
    pub login: String,
}

/* Router Function and Handler Function */

/// Admin dashboard routes, all behind the session gate. Suppose to be nested
/// under `/api/admin`.
pub fn create_admin_router<R, S, T>(
    list_service: ListRegistrationsUsecase<R>,
    delete_service: DeleteRegistrationUsecase<R, S>,
    token_generator: T,
    environment: Environment,
) -> Router
where
    R: RegistrationRepository + 'static,
    S: ReceiptStore + 'static,
    T: TokenGenerator + 'static,
{
    let state = AdminState {
        list_service: Arc::new(list_service),
        delete_service: Arc::new(delete_service),
        environment,
    };

    Router::new()
        .route("/registrations", get(list::<R, S>))
        .route("/registrations/{id}", delete(remove::<R, S>))
        .route_layer(middleware::from_fn_with_state(
            Arc::new(token_generator),
            require_admin::<T>,
        ))
        .with_state(state)
}

pub struct AdminState<R: RegistrationRepository, S: ReceiptStore> {
    list_service: Arc<ListRegistrationsUsecase<R>>,
    delete_service: Arc<DeleteRegistrationUsecase<R, S>>,
    environment: Environment,
}

impl<R: RegistrationRepository, S: ReceiptStore> Clone for AdminState<R, S> {
    fn clone(&self) -> Self {
        Self {
            list_service: Arc::clone(&self.list_service),
            delete_service: Arc::clone(&self.delete_service),
            environment: self.environment,
        }
    }
}

/// Session token from `Authorization: Bearer`, falling back to the session
/// cookie
fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(UnauthorizedResponse {
            error: message.to_string(),
            login: LOGIN_PATH.to_string(),
        }),
    )
        .into_response()
}

/// Session gate: rejects the request unless it carries a valid admin token,
/// and hands the admin to the handler as an extension
async fn require_admin<T: TokenGenerator>(
    State(tokens): State<Arc<T>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return unauthorized("Sign in to access the admin dashboard");
    };

    match tokens.verify(&token) {
        Ok(admin) => {
            request.extensions_mut().insert(admin);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "rejected admin session");
            unauthorized("Your session has expired. Please sign in again")
        }
    }
}

// handler function

/// handler function for the registration listing
async fn list<R: RegistrationRepository, S: ReceiptStore>(
    State(state): State<AdminState<R, S>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let course = match query.course.as_deref().unwrap_or_default().parse::<CourseFilter>() {
        Ok(course) => course,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ActionResponse::failure(e.to_string())))
                .into_response();
        }
    };
    let filter = RegistrationFilter {
        course,
        department: query.department.unwrap_or_default(),
        search: query.search.unwrap_or_default(),
    };

    match state.list_service.list(&filter).await {
        Ok(listing) => {
            let registrations: Vec<RegistrationResponse> = listing
                .registrations
                .into_iter()
                .map(RegistrationResponse::from)
                .collect();
            (
                StatusCode::OK,
                Json(ListResponse {
                    total: registrations.len(),
                    registrations,
                    departments: listing.departments,
                }),
            )
                .into_response()
        }
        Err(PipelineError::PermissionDenied(detail)) => {
            permission_denied(&detail, state.environment)
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ActionResponse::failure(LIST_FAILURE_MESSAGE)),
        )
            .into_response(),
    }
}

/// handler function for deleting a registration and its receipt
async fn remove<R: RegistrationRepository, S: ReceiptStore>(
    State(state): State<AdminState<R, S>>,
    Extension(admin): Extension<Admin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeleteRequest>,
) -> Response {
    info!(admin = admin.email(), id = %id, "admin requested registration delete");

    match state
        .delete_service
        .delete(RegistrationId::from_uuid(id), payload.receipt_url.trim())
        .await
    {
        Ok(()) => (StatusCode::OK, Json(ActionResponse::ok(DELETE_SUCCESS_MESSAGE))).into_response(),
        Err(PipelineError::PermissionDenied(detail)) => {
            permission_denied(&detail, state.environment)
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ActionResponse::failure(delete_failure_message(&e))),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_token_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(header::COOKIE, HeaderValue::from_static("admin_session=from-cookie"));

        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; admin_session=abc.def; lang=en"),
        );

        assert_eq!(session_token(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn cleared_cookie_is_no_session() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("admin_session="));

        assert_eq!(session_token(&headers), None);
    }
}
