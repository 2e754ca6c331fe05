//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_CHECKOUT_CURRENCY, DEFAULT_DATABASE_URL, DEFAULT_FRONTEND_URL,
    DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_PAYMENT_API_BASE, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Frontend origin used for checkout success/cancel redirects
    pub frontend_url: String,
    /// Payment provider secret key (Stripe-style `sk_...`)
    pub payment_secret_key: String,
    /// Payment provider API base URL (overridable for tests)
    pub payment_api_base: String,
    /// Currency used for checkout sessions
    pub checkout_currency: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("frontend_url", &self.frontend_url)
            .field("payment_secret_key", &"[REDACTED]")
            .field("payment_api_base", &self.payment_api_base)
            .field("checkout_currency", &self.checkout_currency)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                // Development mode: use default but warn
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                // Production mode: panic
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        // Validate JWT secret length
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let payment_secret_key = env::var("PAYMENT_SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("PAYMENT_SECRET_KEY not set, checkout will be unavailable");
            String::new()
        });

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            payment_secret_key,
            payment_api_base: env::var("PAYMENT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_PAYMENT_API_BASE.to_string()),
            checkout_currency: env::var("CHECKOUT_CURRENCY")
                .unwrap_or_else(|_| DEFAULT_CHECKOUT_CURRENCY.to_string()),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Build a config with an explicit secret (for tests).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests(jwt_secret: &str, jwt_expiration_hours: i64) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.to_string(),
            jwt_expiration_hours,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            payment_secret_key: "sk_test_dummy".to_string(),
            payment_api_base: DEFAULT_PAYMENT_API_BASE.to_string(),
            checkout_currency: DEFAULT_CHECKOUT_CURRENCY.to_string(),
        }
    }
}
