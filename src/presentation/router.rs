use axum::{Json, Router, response::IntoResponse, routing::get};
use serde_json::json;

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Assemble the portal from the per-area routers:
/// `/api` (public), `/api/auth`, `/api/admin` and the receipt downloads
pub fn create_app_router(
    registration_router: Router,
    auth_router: Router,
    admin_router: Router,
    receipt_router: Router,
) -> Router {
    let api = Router::new()
        .merge(registration_router)
        .nest("/auth", auth_router)
        .nest("/admin", admin_router);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .merge(receipt_router)
}
