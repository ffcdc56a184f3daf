//! Checkout configuration loaded from environment variables.
//!
//! All knobs are read once at startup into an explicit struct; nothing else
//! in the service touches process environment state.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CHECKOUT_DATABASE_URL` - `PostgreSQL` connection string
//! - `CHECKOUT_BASE_URL` - Public URL used to build the success/cancel redirects
//! - `STRIPE_SECRET_KEY` - Stripe API secret key
//!
//! ## Optional
//! - `CHECKOUT_HOST` - Bind address (default: 127.0.0.1)
//! - `CHECKOUT_PORT` - Listen port (default: 3000)
//! - `CHECKOUT_CURRENCY` - ISO 4217 pricing currency (default: USD)
//! - `CHECKOUT_BASE_PRICE_CENTS` - Base case price in cents (default: 1400)
//! - `CHECKOUT_TEXTURED_SURCHARGE_CENTS` - Textured finish surcharge (default: 300)
//! - `CHECKOUT_POLYCARBONATE_SURCHARGE_CENTS` - Polycarbonate surcharge (default: 500)
//! - `CHECKOUT_ALLOWED_SHIPPING_COUNTRIES` - Comma-separated ISO country codes (default: DE,US)
//! - `CHECKOUT_PRODUCT_NAME` - Display name of the purchasable item (default: Custom iPhone Case)
//! - `STRIPE_API_VERSION` - Pinned Stripe API version header
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use caseforge_core::CurrencyCode;

use crate::pricing::PriceTable;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Checkout application configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL used to build redirect URLs
    pub base_url: String,
    /// Stripe API configuration
    pub stripe: StripeConfig,
    /// Pricing rule table
    pub pricing: PriceTable,
    /// Currency all prices are quoted in
    pub currency: CurrencyCode,
    /// Countries the checkout collects shipping addresses for
    pub allowed_shipping_countries: Vec<String>,
    /// Display name of the one-time purchasable item
    pub product_name: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Stripe API configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe API secret key (server-side only)
    pub secret_key: SecretString,
    /// Pinned Stripe API version, sent as the `Stripe-Version` header
    pub api_version: Option<String>,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the Stripe key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CHECKOUT_DATABASE_URL")?;
        let host = parse_env_or_default("CHECKOUT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("CHECKOUT_PORT", "3000")?;
        let base_url = parse_base_url(&get_required_env("CHECKOUT_BASE_URL")?)?;

        let stripe = StripeConfig::from_env()?;
        let pricing = PriceTable {
            base_cents: parse_env_or_default("CHECKOUT_BASE_PRICE_CENTS", "1400")?,
            textured_finish_cents: parse_env_or_default("CHECKOUT_TEXTURED_SURCHARGE_CENTS", "300")?,
            polycarbonate_material_cents: parse_env_or_default(
                "CHECKOUT_POLYCARBONATE_SURCHARGE_CENTS",
                "500",
            )?,
        };
        let currency = parse_env_or_default("CHECKOUT_CURRENCY", "USD")?;
        let allowed_shipping_countries =
            parse_country_list(&get_env_or_default("CHECKOUT_ALLOWED_SHIPPING_COUNTRIES", "DE,US"))?;
        let product_name = get_env_or_default("CHECKOUT_PRODUCT_NAME", "Custom iPhone Case");

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            stripe,
            pricing,
            currency,
            allowed_shipping_countries,
            product_name,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StripeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: get_validated_secret("STRIPE_SECRET_KEY")?,
            api_version: get_optional_env("STRIPE_API_VERSION"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable with a default and parse it.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate the public base URL and strip any trailing slash.
///
/// Redirect URLs are built by appending paths to this value, so a trailing
/// slash would produce double-slash URLs.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("CHECKOUT_BASE_URL".to_string(), e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            "CHECKOUT_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    Ok(raw.trim_end_matches('/').to_owned())
}

/// Parse a comma-separated list of two-letter ISO country codes.
fn parse_country_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let countries: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_ascii_uppercase)
        .collect();

    if countries.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "CHECKOUT_ALLOWED_SHIPPING_COUNTRIES".to_string(),
            "must contain at least one country code".to_string(),
        ));
    }
    if let Some(bad) = countries.iter().find(|c| c.len() != 2) {
        return Err(ConfigError::InvalidEnvVar(
            "CHECKOUT_ALLOWED_SHIPPING_COUNTRIES".to_string(),
            format!("'{bad}' is not a two-letter country code"),
        ));
    }

    Ok(countries)
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_strips_trailing_slash() {
        assert_eq!(
            parse_base_url("https://shop.test/").unwrap(),
            "https://shop.test"
        );
        assert_eq!(
            parse_base_url("http://localhost:3000").unwrap(),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_non_http() {
        assert!(parse_base_url("ftp://shop.test").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_parse_country_list() {
        assert_eq!(parse_country_list("DE,US").unwrap(), vec!["DE", "US"]);
        assert_eq!(
            parse_country_list(" de , us ,gb").unwrap(),
            vec!["DE", "US", "GB"]
        );
    }

    #[test]
    fn test_parse_country_list_rejects_bad_codes() {
        assert!(parse_country_list("").is_err());
        assert!(parse_country_list("GERMANY").is_err());
        assert!(parse_country_list("DE,").is_ok());
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-stripe-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("sk_test_4eC39HqLyjWDarjtT1zdp7dc", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = CheckoutConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            stripe: StripeConfig {
                secret_key: SecretString::from("sk_test_abc123"),
                api_version: None,
            },
            pricing: PriceTable {
                base_cents: 1400,
                textured_finish_cents: 300,
                polycarbonate_material_cents: 500,
            },
            currency: CurrencyCode::USD,
            allowed_shipping_countries: vec!["DE".to_string(), "US".to_string()],
            product_name: "Custom iPhone Case".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_stripe_config_debug_redacts_secret() {
        let config = StripeConfig {
            secret_key: SecretString::from("sk_live_super_secret"),
            api_version: Some("2024-06-20".to_string()),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_live_super_secret"));
        assert!(debug_output.contains("2024-06-20"));
    }
}
