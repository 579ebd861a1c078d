//! Configuration module for the SkillSwap backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SKILLSWAP_BIND_ADDR format: {0}")]
    BindAddr(String),
    #[error("Invalid {name} value: {value}")]
    Number { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HMAC secret for signing access tokens; an ephemeral one is generated when absent
    pub jwt_secret: Option<String>,
    /// Lifetime of issued access tokens, in seconds
    pub token_ttl_secs: u64,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Maximum number of pooled database connections
    pub db_max_connections: u32,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit log lines as JSON
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("SKILLSWAP_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let token_ttl_secs = parse_number("SKILLSWAP_TOKEN_TTL_SECS", 3600)?;

        let db_path = env::var("SKILLSWAP_DB_PATH")
            .unwrap_or_else(|_| "./data/skillswap.sqlite".to_string())
            .into();

        let db_max_connections = parse_number("SKILLSWAP_DB_MAX_CONNECTIONS", 5)?;

        let bind_addr_raw =
            env::var("SKILLSWAP_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let bind_addr = bind_addr_raw
            .parse()
            .map_err(|_| ConfigError::BindAddr(bind_addr_raw))?;

        let log_level = env::var("SKILLSWAP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("SKILLSWAP_LOG_JSON")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            jwt_secret,
            token_ttl_secs,
            db_path,
            db_max_connections,
            bind_addr,
            log_level,
            log_json,
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Number { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "SKILLSWAP_JWT_SECRET",
        "SKILLSWAP_TOKEN_TTL_SECS",
        "SKILLSWAP_DB_PATH",
        "SKILLSWAP_DB_MAX_CONNECTIONS",
        "SKILLSWAP_BIND_ADDR",
        "SKILLSWAP_LOG_LEVEL",
        "SKILLSWAP_LOG_JSON",
    ];

    // Both cases live in one test because they mutate the shared process environment.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();

        assert!(config.jwt_secret.is_none());
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.db_path, PathBuf::from("./data/skillswap.sqlite"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);

        env::set_var("SKILLSWAP_TOKEN_TTL_SECS", "soon");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Number {
                name: "SKILLSWAP_TOKEN_TTL_SECS",
                ..
            })
        ));
        env::remove_var("SKILLSWAP_TOKEN_TTL_SECS");

        env::set_var("SKILLSWAP_BIND_ADDR", "not-an-address");
        assert!(matches!(Config::from_env(), Err(ConfigError::BindAddr(_))));
        env::remove_var("SKILLSWAP_BIND_ADDR");
    }
}
