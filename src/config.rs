use std::{fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

/// Accepted range for `JWT_EXPIRATION_HOURS`, one hour up to a year
const JWT_EXPIRATION_RANGE: std::ops::RangeInclusive<i64> = 1..=8760;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptBackend {
    Local {
        dir: PathBuf,
    },
    Supabase {
        url: String,
        service_key: String,
        bucket: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub public_base_url: String,
    pub receipt_backend: ReceiptBackend,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub admin_seed: Option<AdminSeed>,
    pub environment: Environment,
    pub cors_allow_origin: Option<String>,
    pub http_timeout_secs: u64,
}

impl Config {
    /// Read `.env` if present, then the process environment
    pub fn load() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_err() {
            info!("No .env file found, reading process environment only");
        }
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars { lookup: &lookup };

        let port = vars.parse_or("PORT", 8080)?;
        let public_base_url = vars
            .optional("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        let receipt_backend = match vars.optional("RECEIPT_BACKEND").as_deref() {
            None | Some("local") => ReceiptBackend::Local {
                dir: vars
                    .optional("RECEIPT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./data")),
            },
            Some("supabase") => ReceiptBackend::Supabase {
                url: vars.required("SUPABASE_URL")?,
                service_key: vars.required("SUPABASE_SERVICE_ROLE_KEY")?,
                bucket: vars.required("SUPABASE_BUCKET")?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "RECEIPT_BACKEND",
                    message: format!("expected local or supabase, got {other}"),
                });
            }
        };

        let admin_seed = match (vars.optional("ADMIN_EMAIL"), vars.optional("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            _ => {
                warn!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together, skipping admin seed");
                None
            }
        };

        let environment = match vars.optional("APP_ENV").as_deref() {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        };

        let gemini_api_key = vars.optional("GEMINI_API_KEY");
        if gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set, course recommendations will fail");
        }

        Ok(Self {
            port,
            database_url: vars.required("DATABASE_URL")?,
            db_max_connections: vars.parse_or("DB_MAX_CONNECTIONS", 10)?,
            public_base_url,
            receipt_backend,
            gemini_api_key,
            gemini_model: vars
                .optional("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            jwt_secret: vars.required("JWT_SECRET")?,
            jwt_expiration_hours: vars.parse_in("JWT_EXPIRATION_HOURS", 24, JWT_EXPIRATION_RANGE)?,
            admin_seed,
            environment,
            cors_allow_origin: vars.optional("CORS_ALLOW_ORIGIN"),
            http_timeout_secs: vars.parse_or("HTTP_TIMEOUT_SECS", 30)?,
        })
    }
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

struct Vars<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Vars<'_> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        match self.optional(key) {
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                message: e.to_string(),
            }),
            None => {
                info!("{key} not set, using default: {default}");
                Ok(default)
            }
        }
    }

    fn parse_in<T>(
        &self,
        key: &'static str,
        default: T,
        range: std::ops::RangeInclusive<T>,
    ) -> Result<T, ConfigError>
    where
        T: FromStr + Display + PartialOrd,
        T::Err: Display,
    {
        let value = self.parse_or(key, default)?;
        if !range.contains(&value) {
            return Err(ConfigError::Invalid {
                key,
                message: format!(
                    "{value} is outside {}..={}",
                    range.start(),
                    range.end()
                ),
            });
        }
        Ok(value)
    }
}
