use anyhow::Result;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Detects the environment from the process variables.
    pub fn detect() -> Self {
        Self::detect_with(&|key: &str| env::var(key).ok())
    }

    fn detect_with(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        // Lambda always means production
        if lookup("AWS_LAMBDA_FUNCTION_NAME").is_some() {
            return Self::Production;
        }

        match lookup("APP_ENV").as_deref() {
            Some("production" | "prod") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database_url: String,
    pub db_pool_size: u32,
    pub jwt_secret: String,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
    /// Upper bound for a single store call.
    pub store_timeout: Duration,
    /// Base URL of the URL shortener. Account deletion skips the data purge when unset.
    pub url_service_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    /// Loads the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(Environment::detect(), &|key: &str| env::var(key).ok())
    }

    fn from_lookup(
        environment: Environment,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        tracing::info!(
            "Environment detected: {}",
            environment.as_str().to_uppercase()
        );

        let database_url = Self::get_database_url(&environment, lookup)?;
        let jwt_secret = Self::get_jwt_secret(&environment, lookup)?;

        let access_token_ttl = ttl_var(
            lookup,
            "ACCESS_TOKEN_TTL_MINUTES",
            15,
            chrono::Duration::try_minutes,
        )?;
        let refresh_token_ttl =
            ttl_var(lookup, "REFRESH_TOKEN_TTL_HOURS", 720, chrono::Duration::try_hours)?;
        let bcrypt_cost: u32 = parse_var(lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST);
        if !(4..=31).contains(&bcrypt_cost) {
            anyhow::bail!("BCRYPT_COST must be between 4 and 31 (current: {bcrypt_cost})");
        }
        let store_timeout_ms: u64 = parse_var(lookup, "STORE_TIMEOUT_MS", 5000);
        let db_pool_size: u32 = parse_var(lookup, "DB_POOL_SIZE", 5);

        let url_service_url = lookup("URL_SERVICE_URL").filter(|url| !url.trim().is_empty());
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port: u16 = parse_var(lookup, "SERVER_PORT", 3000);

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("   Database: {}", Self::mask_credentials(&database_url));
        tracing::debug!("   URL service: {:?}", url_service_url);
        tracing::debug!("   Server: {}:{}", server_host, server_port);

        Ok(Self {
            environment,
            database_url,
            db_pool_size,
            jwt_secret,
            access_token_ttl,
            refresh_token_ttl,
            bcrypt_cost,
            store_timeout: Duration::from_millis(store_timeout_ms),
            url_service_url,
            server_host,
            server_port,
        })
    }

    /// DATABASE_URL, or in development one assembled from the POSTGRES_* parts.
    fn get_database_url(
        environment: &Environment,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<String> {
        if let Some(url) = lookup("DATABASE_URL") {
            return Ok(url);
        }

        if environment.is_production() {
            anyhow::bail!(
                "DATABASE_URL must be set in production! \
                 Configure it in Lambda environment variables."
            );
        }

        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Ok(format!(
            "postgres://{}:{}@{}:{}/{}",
            var("POSTGRES_USER", "postgres"),
            var("POSTGRES_PASSWORD", "postgres"),
            var("DB_HOST", "localhost"),
            var("DB_PORT", "5432"),
            var("POSTGRES_DB", "sso_db"),
        ))
    }

    fn get_jwt_secret(
        environment: &Environment,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<String> {
        let secret = match lookup("JWT_SECRET") {
            Some(s) => s,
            None if environment.is_production() => {
                tracing::error!("JWT_SECRET not set in production!");
                anyhow::bail!("JWT_SECRET is required in production");
            }
            None => {
                tracing::warn!("JWT_SECRET not set, using default (DEVELOPMENT ONLY!)");
                "dev_secret_key_change_in_production".to_string()
            }
        };

        if environment.is_production() && secret.len() < 32 {
            anyhow::bail!(
                "JWT_SECRET must be at least 32 characters in production (current: {})",
                secret.len()
            );
        }

        Ok(secret)
    }

    /// Masks credentials in connection strings before logging them.
    fn mask_credentials(url: &str) -> String {
        if let Some(at_pos) = url.find('@')
            && let Some(scheme_end) = url.find("://")
        {
            let scheme = &url[..scheme_end + 3];
            let after_at = &url[at_pos..];
            return format!("{scheme}***:***{after_at}");
        }
        url.to_string()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

/// Parses `key`, falling back to `default` when it is unset or unparsable.
fn parse_var<T>(lookup: &dyn Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "invalid value, using default");
            default
        }),
    }
}

/// Reads a positive TTL in the unit `to_duration` converts from.
fn ttl_var(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: i64,
    to_duration: fn(i64) -> Option<chrono::Duration>,
) -> Result<chrono::Duration> {
    let value: i64 = parse_var(lookup, key, default);
    if value <= 0 {
        anyhow::bail!("{key} must be positive (current: {value})");
    }
    to_duration(value).ok_or_else(|| anyhow::anyhow!("{key} is out of range (current: {value})"))
}
