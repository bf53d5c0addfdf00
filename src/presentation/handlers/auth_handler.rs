use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    config::Environment,
    domain::{
        error::DomainError,
        models::admin::Admin,
        repositories::credential_repository::CredentialRepository,
        services::{password_service::PasswordHasher, token_service::TokenGenerator},
    },
    usecase::login_usecase::LoginUsecase,
};

/// Cookie carrying the admin session token
pub const SESSION_COOKIE: &str = "admin_session";

// Request

/// json for login request
#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Response

/// json for login response
#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminInfo,
}

#[derive(Serialize, Deserialize)]
pub struct AdminInfo {
    pub id: String,
    pub email: String,
}

impl From<Admin> for AdminInfo {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id().to_string(),
            email: admin.email().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct AuthErrorResponse {
    pub error: String,
}

/* Router Function and Handler Function */

/// Admin sign-in and sign-out. Suppose to be nested under `/api/auth`.
pub fn create_auth_router<C, P, T>(
    login_service: LoginUsecase<C, P, T>,
    environment: Environment,
) -> Router
where
    C: CredentialRepository + 'static,
    P: PasswordHasher + 'static,
    T: TokenGenerator + 'static,
{
    let state = AuthState {
        login_service: Arc::new(login_service),
        secure_cookie: environment.is_production(),
    };

    Router::new()
        .route("/login", post(login::<C, P, T>))
        .route("/logout", post(logout::<C, P, T>))
        .with_state(state)
}

pub struct AuthState<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator> {
    login_service: Arc<LoginUsecase<C, P, T>>,
    secure_cookie: bool,
}

impl<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator> Clone for AuthState<C, P, T> {
    fn clone(&self) -> Self {
        Self {
            login_service: Arc::clone(&self.login_service),
            secure_cookie: self.secure_cookie,
        }
    }
}

fn session_cookie(value: &str, max_age: Option<i64>, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/");
    if let Some(seconds) = max_age {
        cookie.push_str(&format!("; Max-Age={seconds}"));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

// handler function

/// handler function for login
async fn login<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator>(
    State(state): State<AuthState<C, P, T>>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    match state
        .login_service
        .login(payload.email, payload.password)
        .await
    {
        Ok(result) => {
            let cookie = session_cookie(&result.token, None, state.secure_cookie);
            let Ok(cookie) = HeaderValue::from_str(&cookie) else {
                error!("session token is not a valid header value");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            };
            let response = LoginResponse {
                token: result.token,
                admin: result.admin.into(),
            };
            (
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(response),
            )
                .into_response()
        }
        Err(DomainError::Repository(e)) => {
            error!(error = %e, "admin lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AuthErrorResponse {
                    error: "Sign-in is unavailable right now".to_string(),
                }),
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(AuthErrorResponse {
                error: "Authentication failed".to_string(),
            }),
        )
            .into_response(),
    }
}

/// handler function for logout
async fn logout<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator>(
    State(state): State<AuthState<C, P, T>>,
) -> Response {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, session_cookie("", Some(0), state.secure_cookie))],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_cookie_is_http_only() {
        let cookie = session_cookie("abc.def.ghi", None, false);
        assert_eq!(cookie, "admin_session=abc.def.ghi; HttpOnly; SameSite=Lax; Path=/");
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = session_cookie("", Some(0), true);
        assert!(cookie.starts_with("admin_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.ends_with("; Secure"));
    }
}
