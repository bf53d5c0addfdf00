use async_trait::async_trait;

use crate::domain::{
    error::StorageError,
    models::receipt::{ReceiptKey, ReceiptUpload, StoredReceipt},
};

/// Binary object store for payment receipts
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Store the receipt under `key` and return a URL it can be fetched from
    async fn put(&self, key: &ReceiptKey, receipt: &ReceiptUpload) -> Result<String, StorageError>;

    async fn get(&self, key: &ReceiptKey) -> Result<StoredReceipt, StorageError>;

    /// Delete by URL (as returned from `put`) or bare key.
    /// `StorageError::NotFound` when nothing is stored there.
    async fn delete(&self, url_or_key: &str) -> Result<(), StorageError>;
}
