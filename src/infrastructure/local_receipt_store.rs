use std::{io, path::PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::domain::{
    error::StorageError,
    models::receipt::{ReceiptKey, ReceiptUpload, StoredReceipt},
    services::receipt_store::ReceiptStore,
};

/// Receipts on local disk under `root/<key>`, served back by the portal at
/// `<public_base_url>/<key>`
#[derive(Clone)]
pub struct LocalReceiptStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalReceiptStore {
    pub async fn new(root: PathBuf, public_base_url: String) -> Result<Self, StorageError> {
        fs::create_dir_all(root.join("receipts"))
            .await
            .map_err(map_io_err)?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn path_for(&self, key: &ReceiptKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    fn url_for(&self, key: &ReceiptKey) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn key_from(&self, url_or_key: &str) -> Result<ReceiptKey, StorageError> {
        let raw = url_or_key
            .strip_prefix(&self.public_base_url)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(url_or_key);
        ReceiptKey::parse(raw)
            .ok_or_else(|| StorageError::Backend(format!("Not a receipt reference: {url_or_key}")))
    }
}

#[async_trait]
impl ReceiptStore for LocalReceiptStore {
    async fn put(&self, key: &ReceiptKey, receipt: &ReceiptUpload) -> Result<String, StorageError> {
        fs::write(self.path_for(key), receipt.bytes())
            .await
            .map_err(map_io_err)?;
        Ok(self.url_for(key))
    }

    async fn get(&self, key: &ReceiptKey) -> Result<StoredReceipt, StorageError> {
        let bytes = fs::read(self.path_for(key)).await.map_err(map_io_err)?;
        Ok(StoredReceipt {
            content_type: key.content_type().to_string(),
            bytes,
        })
    }

    async fn delete(&self, url_or_key: &str) -> Result<(), StorageError> {
        let key = self.key_from(url_or_key)?;
        fs::remove_file(self.path_for(&key))
            .await
            .map_err(map_io_err)
    }
}

fn map_io_err(error: io::Error) -> StorageError {
    match error.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound,
        io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(error.to_string()),
        _ => StorageError::Backend(error.to_string()),
    }
}
