use async_trait::async_trait;

use crate::{
    domain::{
        error::StorageError,
        models::receipt::{ReceiptKey, ReceiptUpload, StoredReceipt},
        services::receipt_store::ReceiptStore,
    },
    infrastructure::{
        local_receipt_store::LocalReceiptStore, supabase_receipt_store::SupabaseReceiptStore,
    },
};

/// Receipt backend picked at start-up from configuration
#[derive(Clone)]
pub enum ConfiguredReceiptStore {
    Local(LocalReceiptStore),
    Supabase(SupabaseReceiptStore),
}

#[async_trait]
impl ReceiptStore for ConfiguredReceiptStore {
    async fn put(&self, key: &ReceiptKey, receipt: &ReceiptUpload) -> Result<String, StorageError> {
        match self {
            Self::Local(store) => store.put(key, receipt).await,
            Self::Supabase(store) => store.put(key, receipt).await,
        }
    }

    async fn get(&self, key: &ReceiptKey) -> Result<StoredReceipt, StorageError> {
        match self {
            Self::Local(store) => store.get(key).await,
            Self::Supabase(store) => store.get(key).await,
        }
    }

    async fn delete(&self, url_or_key: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(store) => store.delete(url_or_key).await,
            Self::Supabase(store) => store.delete(url_or_key).await,
        }
    }
}
