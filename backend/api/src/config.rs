//! Application configuration loaded from environment variables.

use crate::errors::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Base URL of the hosted-checkout provider
    pub checkout_url: String,
    /// Secret key sent to the checkout provider
    pub checkout_secret: String,
    /// URL the provider redirects to after a successful purchase
    pub checkout_success_url: String,
    /// URL the provider redirects to on cancel
    pub checkout_cancel_url: String,
    /// Hard cap on the `limit` field of search requests
    pub max_page_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./investhub.db".to_string()),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid API_PORT".to_string()))?,
            checkout_url: env_var("CHECKOUT_URL")
                .unwrap_or_else(|_| "https://checkout.example.com".to_string()),
            checkout_secret: env_var("CHECKOUT_SECRET").map_err(|_| {
                ApiError::Config("CHECKOUT_SECRET environment variable is required".to_string())
            })?,
            checkout_success_url: env_var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:5173/subscription/success".to_string()),
            checkout_cancel_url: env_var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:5173/subscription/cancel".to_string()),
            max_page_size: env_var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid MAX_PAGE_SIZE".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ApiError::Config(format!("Missing env var: {key}")))
}
