//! Service configuration.
//!
//! Every setting can be given on the command line or through an environment
//! variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OWL_LOG_LEVEL` | info | Log level |
//! | `OWL_BACKEND` | memory | Storage backend (`memory` or `mongodb`) |
//! | `OWL_DB_HOST` | 127.0.0.1 | Database host |
//! | `OWL_DB_PORT` | 27017 | Database port |
//! | `OWL_DB_USERNAME` | | Database username |
//! | `OWL_DB_PASSWORD` | | Database password |
//! | `OWL_DB_NAME` | minerva | Database name |
//! | `OWL_CONNECT_TIMEOUT` | 10s | Connection deadline |
//! | `OWL_OPERATION_TIMEOUT` | 10s | Per-operation deadline |
//! | `OWL_POOL_SIZE` | 2 | Connections per host |
//! | `OWL_DEFAULT_PAGE_SIZE` | 10 | Page size when none is requested |
//! | `OWL_MAX_PAGE_SIZE` | 100 | Largest page size a client may request |
//! | `OWL_AUTH_KEY` | | 32-byte hex key used to encrypt user tokens |
//!
//! # Example
//!
//! ```rust
//! use owl::OwlConfig;
//! use std::time::Duration;
//!
//! let config = OwlConfig {
//!     db_host: "mongo.internal".to_string(),
//!     operation_timeout: Duration::from_secs(2),
//!     ..OwlConfig::for_testing()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.backend_config().host, "mongo.internal");
//! ```

use std::time::Duration;

use clap::Parser;
use owl_persistence::core::{BackendConfig, BackendKind};
use owl_persistence::types::PaginationConfig;

/// Service configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "owl")]
#[command(about = "Minerva Owl organization and user service")]
pub struct OwlConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "OWL_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Storage backend.
    #[arg(long, env = "OWL_BACKEND", default_value = "memory")]
    pub backend: BackendKind,

    /// Database host.
    #[arg(long, env = "OWL_DB_HOST", default_value = "127.0.0.1")]
    pub db_host: String,

    /// Database port.
    #[arg(long, env = "OWL_DB_PORT", default_value = "27017")]
    pub db_port: u16,

    /// Database username. Omit if the database has no authentication.
    #[arg(long, env = "OWL_DB_USERNAME")]
    pub db_username: Option<String>,

    /// Database password. Omit if the database has no authentication.
    #[arg(long, env = "OWL_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database name.
    #[arg(long, env = "OWL_DB_NAME", default_value = "minerva")]
    pub db_name: String,

    /// Deadline for connecting to the database (e.g. `10s`, `500ms`).
    #[arg(long, env = "OWL_CONNECT_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration)]
    pub connect_timeout: Duration,

    /// Deadline for each persistence operation.
    #[arg(long, env = "OWL_OPERATION_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration)]
    pub operation_timeout: Duration,

    /// Number of connections per host.
    #[arg(long, env = "OWL_POOL_SIZE", default_value = "2")]
    pub pool_size: u32,

    /// Page size used when a request does not specify one.
    #[arg(long, env = "OWL_DEFAULT_PAGE_SIZE", default_value = "10")]
    pub default_page_size: i64,

    /// Maximum page size a request may ask for.
    #[arg(long, env = "OWL_MAX_PAGE_SIZE", default_value = "100")]
    pub max_page_size: i64,

    /// AES-256 key for user tokens, as 64 hex characters.
    #[arg(long, env = "OWL_AUTH_KEY", hide_env_values = true)]
    pub auth_key: Option<String>,
}

impl Default for OwlConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            backend: BackendKind::Memory,
            db_host: "127.0.0.1".to_string(),
            db_port: 27017,
            db_username: None,
            db_password: None,
            db_name: "minerva".to_string(),
            connect_timeout: Duration::from_secs(10),
            operation_timeout: Duration::from_secs(10),
            pool_size: 2,
            default_page_size: 10,
            max_page_size: 100,
            auth_key: None,
        }
    }
}

impl OwlConfig {
    /// Validates the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_page_size <= 0 {
            errors.push("Default page size must be positive".to_string());
        }

        if self.max_page_size <= 0 {
            errors.push("Max page size must be positive".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if self.pool_size == 0 {
            errors.push("Pool size cannot be 0".to_string());
        }

        if self.connect_timeout.is_zero() {
            errors.push("Connect timeout cannot be 0".to_string());
        }

        if self.operation_timeout.is_zero() {
            errors.push("Operation timeout cannot be 0".to_string());
        }

        match self.auth_key.as_deref() {
            None | Some("") => errors.push("Auth key is required".to_string()),
            Some(key) if key.len() != 64 || hex::decode(key).is_err() => {
                errors.push("Auth key must be 64 hex characters (32 bytes)".to_string());
            }
            Some(_) => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses the in-memory backend, short timeouts and a fixed auth key.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            connect_timeout: Duration::from_secs(2),
            operation_timeout: Duration::from_secs(2),
            auth_key: Some(
                "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f".to_string(),
            ),
            ..Default::default()
        }
    }

    /// Returns the pagination limits.
    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig::new(self.default_page_size, self.max_page_size)
    }

    /// Returns the database connection settings.
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            username: self.db_username.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            connect_timeout: self.connect_timeout,
            operation_timeout: self.operation_timeout,
            pool_size: self.pool_size,
        }
    }
}
