//! API configuration

use serde::Deserialize;

/// API configuration
///
/// Built once at startup and handed to the pool, the auth gate and the
/// token issuer. Every field has a default, so a partial environment is
/// enough.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Maximum pooled database connections
    pub database_max_connections: u32,
    /// Seconds a query waits for a free pooled connection
    pub database_acquire_timeout_secs: u64,
    /// Log level
    pub log_level: String,
    /// CSV file of historical bills imported into an empty table at startup
    pub seed_bills_csv: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3002,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 1800,
            database_url: "postgres://localhost/billing".to_string(),
            database_max_connections: 10,
            database_acquire_timeout_secs: 5,
            log_level: "info".to_string(),
            seed_bills_csv: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:3002");
        assert_eq!(config.jwt_expiration_secs, 1800);
        assert!(config.seed_bills_csv.is_none());
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: ApiConfig = config::Config::builder()
            .set_override("port", 4000)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_max_connections, 10);
    }
}
