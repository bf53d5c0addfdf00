use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::error;

use crate::domain::{
    error::StorageError, models::receipt::ReceiptKey, services::receipt_store::ReceiptStore,
};

/// Serves receipts written by the local-disk store at the URLs it hands out
pub fn create_receipt_router<S: ReceiptStore + 'static>(receipt_store: S) -> Router {
    Router::new()
        .route("/receipts/{name}", get(download::<S>))
        .with_state(Arc::new(receipt_store))
}

async fn download<S: ReceiptStore>(
    State(store): State<Arc<S>>,
    Path(name): Path<String>,
) -> Response {
    let Some(key) = ReceiptKey::from_file_name(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match store.get(&key).await {
        Ok(receipt) => (
            [
                (header::CONTENT_TYPE, receipt.content_type),
                (header::CACHE_CONTROL, "private, max-age=3600".to_string()),
            ],
            receipt.bytes,
        )
            .into_response(),
        Err(StorageError::NotFound) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!(key = %key, error = %e, "receipt read failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
