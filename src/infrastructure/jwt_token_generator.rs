use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    error::DomainError,
    models::admin::Admin,
    services::token_service::{Token, TokenGenerator},
};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,   // Subject (admin ID)
    email: String, // Admin email
    exp: i64,      // Expiration time
    iat: i64,      // Issued at
}

/// HS256 admin session tokens
#[derive(Clone)]
pub struct JwtTokenGenerator {
    secret: String,
    expiration_hours: i64,
}

impl JwtTokenGenerator {
    pub fn with_expiration(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            expiration_hours,
        }
    }
}

impl TokenGenerator for JwtTokenGenerator {
    fn generate(&self, admin: &Admin) -> Result<Token, DomainError> {
        let now = Utc::now();
        let lifetime = TimeDelta::try_hours(self.expiration_hours).ok_or_else(|| {
            DomainError::InvalidToken(format!(
                "Token lifetime of {} hours is out of range",
                self.expiration_hours
            ))
        })?;
        let exp = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| DomainError::InvalidToken("Token expiry is out of range".to_string()))?;

        let claims = Claims {
            sub: admin.id().to_string(),
            email: admin.email().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| DomainError::InvalidToken(format!("Failed to generate token: {}", e)))
    }

    fn verify(&self, token: &str) -> Result<Admin, DomainError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| DomainError::InvalidToken(e.to_string()))?;

        let id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;

        Ok(Admin::new(id, data.claims.email))
    }
}
