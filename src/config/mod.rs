//! Configuration module for the election backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Program-code prefix accepted in front of a student number when none is configured.
pub const DEFAULT_ID_PREFIXES: &str = "UGPR";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key guarding the president (live monitor) routes
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to the JSON allow-list of eligible voters
    pub voters_path: PathBuf,
    /// Optional JSON file of elections to seed at start-up
    pub elections_path: Option<PathBuf>,
    /// Program-code prefixes stripped from student IDs
    pub id_prefixes: Vec<String>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("ELECTION_API_PSK")
            .ok()
            .filter(|psk| !psk.trim().is_empty());

        let db_path = env::var("ELECTION_DB_PATH")
            .unwrap_or_else(|_| "./data/election.sqlite".to_string())
            .into();

        let voters_path = env::var("ELECTION_VOTERS_PATH")
            .unwrap_or_else(|_| "./data/voters.json".to_string())
            .into();

        let elections_path = env::var("ELECTION_ELECTIONS_PATH").ok().map(PathBuf::from);

        let id_prefixes = parse_prefixes(
            &env::var("ELECTION_ID_PREFIXES").unwrap_or_else(|_| DEFAULT_ID_PREFIXES.to_string()),
        );

        let raw_bind_addr =
            env::var("ELECTION_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = raw_bind_addr.parse().map_err(|_| {
            AppError::Internal(format!(
                "Invalid ELECTION_BIND_ADDR format: {}",
                raw_bind_addr
            ))
        })?;

        let log_level = env::var("ELECTION_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_psk,
            db_path,
            voters_path,
            elections_path,
            id_prefixes,
            bind_addr,
            log_level,
        })
    }
}

/// Split a comma separated prefix list, dropping blanks and upper-casing.
fn parse_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_ascii_uppercase())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("ELECTION_API_PSK");
        env::remove_var("ELECTION_DB_PATH");
        env::remove_var("ELECTION_VOTERS_PATH");
        env::remove_var("ELECTION_ELECTIONS_PATH");
        env::remove_var("ELECTION_ID_PREFIXES");
        env::remove_var("ELECTION_BIND_ADDR");
        env::remove_var("ELECTION_LOG_LEVEL");

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/election.sqlite"));
        assert_eq!(config.voters_path, PathBuf::from("./data/voters.json"));
        assert!(config.elections_path.is_none());
        assert_eq!(config.id_prefixes, vec!["UGPR".to_string()]);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_prefixes() {
        assert_eq!(
            parse_prefixes(" ugpr, PGPR ,,"),
            vec!["UGPR".to_string(), "PGPR".to_string()]
        );
        assert!(parse_prefixes("").is_empty());
    }
}
