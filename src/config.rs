use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. `None` selects the in-memory credential store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    /// Base64-encoded HMAC signing secret.
    pub jwt_secret: String,
    /// Token lifetime in milliseconds.
    pub jwt_expiration_ms: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Configuration("JWT_SECRET must be set".into()))?;

        let jwt_expiration_ms: i64 = lookup("JWT_EXPIRATION_MS")
            .ok_or_else(|| AppError::Configuration("JWT_EXPIRATION_MS must be set".into()))
            .and_then(|raw| parse_value("JWT_EXPIRATION_MS", &raw))?;
        if jwt_expiration_ms <= 0 {
            return Err(AppError::Configuration(
                "JWT_EXPIRATION_MS must be positive".into(),
            ));
        }

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => parse_value("BCRYPT_COST", &raw)?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::Configuration(
                "BCRYPT_COST must be between 4 and 31".into(),
            ));
        }

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => parse_value("SERVER_PORT", &raw)?,
            None => 8080,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            jwt_expiration_ms,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("{} must be a number", key)))
}
