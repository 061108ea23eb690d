use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Cron expression for the daily stats job (UTC midnight, six-field format)
pub const DEFAULT_DAILY_STATS_CRON: &str = "0 0 0 * * *";

/// Issuer stamped into and required of caller tokens
pub const DEFAULT_JWT_ISSUER: &str = "marketplace-functions";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub trigger_secret: String,
    pub payment_service_url: String,
    pub payment_service_api_key: String,
    pub expo_access_token: Option<String>,
    pub daily_stats_cron: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: jwt_issuer_or_default(env::var("JWT_ISSUER").ok()),
            trigger_secret: env::var("TRIGGER_SECRET").context("TRIGGER_SECRET must be set")?,
            payment_service_url: env::var("PAYMENT_SERVICE_URL")
                .context("PAYMENT_SERVICE_URL must be set")?,
            payment_service_api_key: env::var("PAYMENT_SERVICE_API_KEY")
                .context("PAYMENT_SERVICE_API_KEY must be set")?,
            expo_access_token: env::var("EXPO_ACCESS_TOKEN").ok(),
            daily_stats_cron: env::var("DAILY_STATS_CRON")
                .unwrap_or_else(|_| DEFAULT_DAILY_STATS_CRON.to_string()),
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
        })
    }
}

/// Configured token issuer, falling back to [`DEFAULT_JWT_ISSUER`] when unset or blank
pub fn jwt_issuer_or_default(raw: Option<String>) -> String {
    raw.map(|issuer| issuer.trim().to_string())
        .filter(|issuer| !issuer.is_empty())
        .unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string())
}

/// Split a comma separated origin list, dropping blanks
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
