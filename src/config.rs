use std::{env, fmt::Display, str::FromStr};

use chrono::{Duration, Utc};
use log::{info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub storage: StorageBackend,
    pub jwt_secret: String,
    pub jwt_expiry: Duration,
    pub bcrypt_cost: u32,
    pub cors_allowed_origins: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "socialmedia".to_string(),
            storage: StorageBackend::Mongo,
            jwt_secret: "secret".to_string(),
            jwt_expiry: Duration::hours(24),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_allowed_origins: "*".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        if env::var("JWT_SECRET").is_err() {
            warn!("JWT_SECRET not set, falling back to an insecure development secret");
        }

        Ok(Self {
            host: load("HOST", defaults.host)?,
            port: load("PORT", defaults.port)?,
            mongodb_uri: load("MONGODB_URI", defaults.mongodb_uri)?,
            database_name: load("DATABASE_NAME", defaults.database_name)?,
            storage: load("STORAGE_BACKEND", defaults.storage)?,
            jwt_secret: load("JWT_SECRET", defaults.jwt_secret)?,
            jwt_expiry: token_expiry(load("JWT_EXPIRY_HOURS", 24)?)?,
            bcrypt_cost: load("BCRYPT_COST", defaults.bcrypt_cost)?,
            cors_allowed_origins: load("CORS_ALLOWED_ORIGINS", defaults.cors_allowed_origins)?,
        })
    }
}

/// Token lifetime in hours. Must be positive and keep `now + expiry` representable.
fn token_expiry(hours: i64) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key: "JWT_EXPIRY_HOURS".to_string(),
        reason: reason.to_string(),
    };

    if hours <= 0 {
        return Err(invalid("must be a positive number of hours"));
    }
    let expiry = Duration::try_hours(hours).ok_or_else(|| invalid("out of range"))?;
    Utc::now()
        .checked_add_signed(expiry)
        .ok_or_else(|| invalid("out of range"))?;

    Ok(expiry)
}

fn load<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => {
            info!("{key} not set, using default");
            Ok(default)
        }
    }
}
