//! Backend identification and connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default deadline applied to every persistence call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Identifies the type of document store behind a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process reference store.
    Memory,
    /// MongoDB (document store).
    MongoDB,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::MongoDB => write!(f, "mongodb"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "mongodb" | "mongo" => Ok(BackendKind::MongoDB),
            other => Err(format!("unknown backend: {}", other)),
        }
    }
}

/// Connection settings for a networked document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Username, omitted when the database has no authentication.
    pub username: Option<String>,
    /// Password, omitted when the database has no authentication.
    pub password: Option<String>,
    /// Database (or keyspace) name.
    pub database: String,
    /// Deadline for establishing the connection.
    pub connect_timeout: Duration,
    /// Deadline applied to every individual operation.
    pub operation_timeout: Duration,
    /// Connections kept per host.
    pub pool_size: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 27017,
            username: None,
            password: None,
            database: "minerva".to_string(),
            connect_timeout: Duration::from_secs(10),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            pool_size: 2,
        }
    }
}

impl BackendConfig {
    /// Creates a configuration for the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Sets the credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sets the per-operation deadline.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Renders a `mongodb://` connection string.
    ///
    /// Credentials are included only when a username is set, and are
    /// percent-encoded so reserved characters never alter the URI.
    pub fn connection_string(&self) -> String {
        let mut uri = String::from("mongodb://");
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            uri.push_str(&urlencoding::encode(username));
            uri.push(':');
            uri.push_str(&urlencoding::encode(self.password.as_deref().unwrap_or_default()));
            uri.push('@');
        }
        uri.push_str(&format!("{}:{}/", self.host, self.port));
        uri
    }
}
