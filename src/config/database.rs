//! Database configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Database configuration (PostgreSQL)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE_URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(ValidationError::InvalidPoolSize);
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_url(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }

    #[test]
    fn accepts_postgres_urls() {
        assert!(config_with_url("postgres://u@localhost/db").validate().is_ok());
        assert!(config_with_url("postgresql://u@localhost/db").validate().is_ok());
    }

    #[test]
    fn rejects_empty_url() {
        assert!(config_with_url("").validate().is_err());
    }

    #[test]
    fn rejects_non_postgres_scheme() {
        assert_eq!(
            config_with_url("mysql://u@localhost/db").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        );
    }

    #[test]
    fn rejects_zero_pool_size() {
        let mut config = config_with_url("postgres://u@localhost/db");
        config.max_connections = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidPoolSize));
    }
}
