//! In-memory collaborators for tests

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    error::{DomainError, RecommendationError, RepositoryError, StorageError},
    models::{
        admin::{Admin, AdminCredential, HashedPassword},
        receipt::{ReceiptKey, ReceiptUpload, StoredReceipt},
        registration::{MonotonicClock, NewRegistration, Registration, RegistrationId},
    },
    repositories::{
        credential_repository::CredentialRepository,
        registration_repository::RegistrationRepository,
    },
    services::{
        course_recommender::{CourseRecommender, Recommendation},
        password_service::PasswordHasher,
        receipt_store::ReceiptStore,
    },
    validation::RegistrationForm,
};

const MEMORY_SCHEME: &str = "memory://";

#[derive(Debug, Clone, Copy)]
pub enum FakeFailure {
    Permission,
    Transient,
}

impl FakeFailure {
    fn repository_error(self) -> RepositoryError {
        match self {
            FakeFailure::Permission => {
                RepositoryError::PermissionDenied("INSERT command denied to user 'portal'".to_string())
            }
            FakeFailure::Transient => RepositoryError::DatabaseError("connection reset".to_string()),
        }
    }

    fn storage_error(self) -> StorageError {
        match self {
            FakeFailure::Permission => StorageError::PermissionDenied("bucket is read-only".to_string()),
            FakeFailure::Transient => StorageError::Backend("503 Service Unavailable".to_string()),
        }
    }
}

pub fn jane_doe_form() -> RegistrationForm {
    RegistrationForm {
        full_name: "Jane Doe".to_string(),
        department: "Computer Science".to_string(),
        matric_number: "CSC1901".to_string(),
        email: "jane@x.com".to_string(),
        whatsapp_number: "08012345678".to_string(),
        course: "AI/ML".to_string(),
    }
}

pub fn pdf_receipt(size: usize) -> ReceiptUpload {
    ReceiptUpload::new(
        "receipt.pdf".to_string(),
        "application/pdf".to_string(),
        vec![0x25; size],
    )
}

#[derive(Clone, Default)]
pub struct InMemoryRegistrationRepository {
    documents: Arc<Mutex<Vec<Registration>>>,
    clock: Arc<MonotonicClock>,
    failure: Option<FakeFailure>,
}

impl InMemoryRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failure: FakeFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        match self.failure {
            Some(failure) => Err(failure.repository_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn create(
        &self,
        registration: &NewRegistration,
        receipt_url: &str,
    ) -> Result<Registration, RepositoryError> {
        self.check()?;
        let stored = Registration::new(
            RegistrationId::new(),
            registration.clone(),
            receipt_url.to_string(),
            self.clock.now(),
        );
        self.documents.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_recent(&self) -> Result<Vec<Registration>, RepositoryError> {
        self.check()?;
        let mut documents = self.documents.lock().unwrap().clone();
        documents.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        Ok(documents)
    }

    async fn delete(&self, id: RegistrationId) -> Result<(), RepositoryError> {
        self.check()?;
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|registration| registration.id() != id);
        if documents.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryReceiptStore {
    objects: Arc<Mutex<HashMap<String, StoredReceipt>>>,
    puts: Arc<AtomicUsize>,
    failure: Option<FakeFailure>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failure: FakeFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains_url(&self, url: &str) -> bool {
        let key = url.strip_prefix(MEMORY_SCHEME).unwrap_or(url);
        self.objects.lock().unwrap().contains_key(key)
    }

    fn check(&self) -> Result<(), StorageError> {
        match self.failure {
            Some(failure) => Err(failure.storage_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReceiptStore for InMemoryReceiptStore {
    async fn put(&self, key: &ReceiptKey, receipt: &ReceiptUpload) -> Result<String, StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.objects.lock().unwrap().insert(
            key.as_str().to_string(),
            StoredReceipt {
                content_type: receipt.content_type().to_string(),
                bytes: receipt.bytes().to_vec(),
            },
        );
        Ok(format!("{MEMORY_SCHEME}{key}"))
    }

    async fn get(&self, key: &ReceiptKey) -> Result<StoredReceipt, StorageError> {
        self.check()?;
        self.objects
            .lock()
            .unwrap()
            .get(key.as_str())
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn delete(&self, url_or_key: &str) -> Result<(), StorageError> {
        self.check()?;
        let key = url_or_key.strip_prefix(MEMORY_SCHEME).unwrap_or(url_or_key);
        match self.objects.lock().unwrap().remove(key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound),
        }
    }
}

#[derive(Clone, Default)]
pub struct StubRecommender {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl StubRecommender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CourseRecommender for StubRecommender {
    async fn recommend(&self, interests: &str) -> Result<Recommendation, RecommendationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RecommendationError::Request("upstream timed out".to_string()));
        }
        Ok(Recommendation {
            course_recommendation: "Web Development".to_string(),
            reasoning: format!("Based on: {interests}"),
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCredentialRepository {
    admins: Arc<Mutex<Vec<AdminCredential>>>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admin(email: &str, password: &str) -> Self {
        let repository = Self::new();
        let hash = PlainPasswordHasher.hash(password).unwrap();
        repository.admins.lock().unwrap().push(AdminCredential::reconstruct(
            Admin::new(Uuid::new_v4(), email.to_string()),
            hash,
        ));
        repository
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminCredential>, RepositoryError> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|credential| credential.admin().email() == email)
            .cloned())
    }

    async fn create_admin(
        &self,
        email: &str,
        password_hash: HashedPassword,
    ) -> Result<Admin, RepositoryError> {
        let admin = Admin::new(Uuid::new_v4(), email.to_string());
        self.admins
            .lock()
            .unwrap()
            .push(AdminCredential::reconstruct(admin.clone(), password_hash));
        Ok(admin)
    }
}

/// Reversible stand-in for argon2, which is slow in debug builds
#[derive(Clone)]
pub struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        if plain_password.len() < 8 {
            return Err(DomainError::WeakPassword);
        }
        Ok(HashedPassword::new(format!("plain:{plain_password}")))
    }

    fn verify(&self, plain_password: &str, hashed_password: &HashedPassword) -> Result<bool, DomainError> {
        Ok(hashed_password.as_str() == format!("plain:{plain_password}"))
    }
}
