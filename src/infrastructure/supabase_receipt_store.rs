use async_trait::async_trait;
use reqwest::{StatusCode, header::CONTENT_TYPE};

use crate::domain::{
    error::StorageError,
    models::receipt::{ReceiptKey, ReceiptUpload, StoredReceipt},
    services::receipt_store::ReceiptStore,
};

/// Receipts in a Supabase Storage bucket.
///
/// Objects are written through the authenticated API and handed out as
/// public-bucket URLs.
#[derive(Clone)]
pub struct SupabaseReceiptStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseReceiptStore {
    pub fn new(client: reqwest::Client, base_url: &str, service_key: String, bucket: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    fn object_endpoint(&self, key: &ReceiptKey) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }

    fn public_prefix(&self) -> String {
        format!("{}/storage/v1/object/public/{}/", self.base_url, self.bucket)
    }

    fn public_url(&self, key: &ReceiptKey) -> String {
        format!("{}{}", self.public_prefix(), key)
    }

    fn key_from(&self, url_or_key: &str) -> Result<ReceiptKey, StorageError> {
        let prefix = self.public_prefix();
        let raw = url_or_key.strip_prefix(prefix.as_str()).unwrap_or(url_or_key);
        ReceiptKey::parse(raw)
            .ok_or_else(|| StorageError::Backend(format!("Not a receipt reference: {url_or_key}")))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("apikey", self.service_key.clone())
    }
}

#[async_trait]
impl ReceiptStore for SupabaseReceiptStore {
    async fn put(&self, key: &ReceiptKey, receipt: &ReceiptUpload) -> Result<String, StorageError> {
        let response = self
            .authorized(self.client.post(self.object_endpoint(key)))
            .header(CONTENT_TYPE, receipt.content_type())
            .header("x-upsert", "false")
            .body(receipt.bytes().to_vec())
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        check_status(response).await?;
        Ok(self.public_url(key))
    }

    async fn get(&self, key: &ReceiptKey) -> Result<StoredReceipt, StorageError> {
        let response = self
            .authorized(self.client.get(self.object_endpoint(key)))
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let response = check_status(response).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_else(|| key.content_type())
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?
            .to_vec();

        Ok(StoredReceipt {
            content_type,
            bytes,
        })
    }

    async fn delete(&self, url_or_key: &str) -> Result<(), StorageError> {
        let key = self.key_from(url_or_key)?;
        let response = self
            .authorized(self.client.delete(self.object_endpoint(&key)))
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        check_status(response).await.map(|_| ())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_failure(status, &body))
}

/// Storage answers a missing object with either a 404 or a 400 whose body
/// names the 404
fn classify_failure(status: StatusCode, body: &str) -> StorageError {
    let not_found = status == StatusCode::NOT_FOUND
        || (status == StatusCode::BAD_REQUEST
            && (body.contains("\"statusCode\":\"404\"") || body.contains("not_found")));
    if not_found {
        return StorageError::NotFound;
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StorageError::PermissionDenied(format!("{} - {}", status, body))
        }
        _ => StorageError::Backend(format!("Supabase request failed: {} - {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SupabaseReceiptStore {
        SupabaseReceiptStore::new(
            reqwest::Client::new(),
            "https://project.supabase.co/",
            "service-key".to_string(),
            "receipts-bucket".to_string(),
        )
    }

    #[test]
    fn public_url_round_trips_to_key() {
        let store = store();
        let key = ReceiptKey::generate("application/pdf");

        let url = store.public_url(&key);

        assert!(url.starts_with("https://project.supabase.co/storage/v1/object/public/receipts-bucket/receipts/"));
        assert_eq!(store.key_from(&url).unwrap(), key);
        assert_eq!(store.key_from(key.as_str()).unwrap(), key);
    }

    #[test]
    fn missing_object_is_not_found() {
        let body = r#"{"statusCode":"404","error":"not_found","message":"Object not found"}"#;
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, body),
            StorageError::NotFound
        ));
        assert!(matches!(
            classify_failure(StatusCode::NOT_FOUND, ""),
            StorageError::NotFound
        ));
    }

    #[test]
    fn not_found_body_on_other_status_is_a_failure() {
        let body = r#"{"statusCode":"404","error":"not_found","message":"Bucket not found"}"#;
        assert!(matches!(
            classify_failure(StatusCode::INTERNAL_SERVER_ERROR, body),
            StorageError::Backend(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::FORBIDDEN, body),
            StorageError::PermissionDenied(_)
        ));
    }

    #[test]
    fn auth_failures_are_permission_errors() {
        assert!(matches!(
            classify_failure(StatusCode::FORBIDDEN, "{}"),
            StorageError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "{}"),
            StorageError::Backend(_)
        ));
    }
}
