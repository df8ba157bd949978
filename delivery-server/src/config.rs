//! Server configuration

use std::time::Duration;

use crate::error::BoxError;

/// Delivery server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP bind address
    pub http_host: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Maximum pooled connections
    pub database_max_connections: u32,
    /// How long a request waits for a pooled connection
    pub database_acquire_timeout: Duration,
    /// Per-connection `statement_timeout`, in milliseconds
    pub database_statement_timeout_ms: u64,
    /// Load demo data into an empty database at startup
    pub seed_demo_data: bool,
    /// Emit JSON log lines instead of text
    pub log_json: bool,
    /// Optional directory for daily rotated log files
    pub log_dir: Option<String>,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_development = environment == "development";

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: env_or("HTTP_PORT", 8080),
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            database_acquire_timeout: Duration::from_secs(env_or(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                5,
            )),
            database_statement_timeout_ms: env_or("DATABASE_STATEMENT_TIMEOUT_MS", 30_000),
            seed_demo_data: env_or("SEED_DEMO_DATA", is_development),
            log_json: std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// Address the HTTP listener binds to
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_unparsable() {
        assert_eq!(env_or("DELIVERY_TEST_UNSET_VARIABLE", 42u16), 42);
    }

    #[test]
    fn test_http_addr() {
        let config = Config {
            database_url: "postgres://localhost/delivery".into(),
            http_host: "127.0.0.1".into(),
            http_port: 9090,
            environment: "development".into(),
            database_max_connections: 5,
            database_acquire_timeout: Duration::from_secs(5),
            database_statement_timeout_ms: 1000,
            seed_demo_data: false,
            log_json: false,
            log_dir: None,
        };
        assert_eq!(config.http_addr(), "127.0.0.1:9090");
    }
}
