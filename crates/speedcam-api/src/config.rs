//! # API Configuration
//!
//! Environment-based configuration for the REST API service.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default bind address
const DEFAULT_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 3000);

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub server_addr: SocketAddr,

    /// JSON camera store
    pub db_path: PathBuf,

    /// Logging level
    pub log_level: String,

    /// CORS allowed origins, `*` for any
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let server_addr = env::var("SERVER_ADDR")
            .ok()
            .and_then(|v| match v.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(value = %v, error = %e, "Invalid SERVER_ADDR, using default");
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_ADDR));

        Self {
            server_addr,

            db_path: env::var("DB_PATH")
                .unwrap_or_else(|_| "db.json".to_string())
                .into(),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Whether any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(DEFAULT_ADDR),
            db_path: PathBuf::from("db.json"),
            log_level: "info".to_string(),
            cors_origins: vec!["*".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_addr.port(), 3000);
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_explicit_origins() {
        let config = Config {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Config::default()
        };
        assert!(!config.allows_any_origin());
    }
}
