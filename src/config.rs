//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use rust_decimal::Decimal;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Secret used to sign bearer tokens
    pub auth_token_secret: String,

    /// Bearer token lifetime in hours
    pub auth_token_ttl_hours: i64,

    /// Minimum amount accepted for a payment request
    pub min_payment_amount: Decimal,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let auth_token_secret = env::var("AUTH_TOKEN_SECRET")
            .map_err(|_| ConfigError::MissingEnv("AUTH_TOKEN_SECRET"))?;

        let auth_token_ttl_hours = env::var("AUTH_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("AUTH_TOKEN_TTL_HOURS"))?;

        let min_payment_amount = env::var("MIN_PAYMENT_AMOUNT")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("MIN_PAYMENT_AMOUNT"))?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            auth_token_secret,
            auth_token_ttl_hours,
            min_payment_amount,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
