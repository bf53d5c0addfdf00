use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value object representing a hashed password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Create a new HashedPassword from an already hashed string
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Signed-in administrator, as carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    id: Uuid,
    email: String,
}

impl Admin {
    pub fn new(id: Uuid, email: String) -> Self {
        Self { id, email }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Stored admin account with its password hash
#[derive(Debug, Clone)]
pub struct AdminCredential {
    admin: Admin,
    password_hash: HashedPassword,
}

impl AdminCredential {
    pub fn reconstruct(admin: Admin, password_hash: HashedPassword) -> Self {
        Self {
            admin,
            password_hash,
        }
    }

    pub fn admin(&self) -> &Admin {
        &self.admin
    }

    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }
}
