//! Runtime configuration read from `SHELFSCAN_*` environment variables

use crate::storage::DEFAULT_STORAGE_KEY;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default timeout for a single metadata request
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default listen address for the API server
pub const DEFAULT_SERVER_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000);

/// Which metadata service to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    GoogleBooks,
    OpenLibrary,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "google-books" | "googlebooks" => Ok(Self::GoogleBooks),
            "openlibrary" | "open-library" => Ok(Self::OpenLibrary),
            other => Err(format!("unknown metadata source '{}'", other)),
        }
    }
}

/// Browser origins allowed to call the API server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl FromStr for CorsOrigins {
    type Err = String;

    /// `*` for any origin, otherwise a comma-separated list
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "*" {
            return Ok(Self::Any);
        }
        let origins: Vec<String> = s
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() {
            return Err(format!("no origins in '{}'", s));
        }
        Ok(Self::List(origins))
    }
}

/// Shelfscan settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted catalog
    pub data_dir: Option<PathBuf>,
    /// Storage slot name for the catalog
    pub storage_key: String,
    pub primary_source: SourceKind,
    /// Classification fallback; `None` disables the second lookup
    pub secondary_source: Option<SourceKind>,
    pub google_api_key: Option<String>,
    pub http_timeout: Duration,
    /// API server listen address
    pub server_addr: SocketAddr,
    /// `None` allows the local development origins only
    pub cors_origins: Option<CorsOrigins>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            primary_source: SourceKind::GoogleBooks,
            secondary_source: Some(SourceKind::OpenLibrary),
            google_api_key: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            server_addr: DEFAULT_SERVER_ADDR,
            cors_origins: None,
        }
    }
}

impl Config {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or invalid values keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("SHELFSCAN_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = get("SHELFSCAN_STORAGE_KEY") {
            config.storage_key = key;
        }
        if let Some(value) = get("SHELFSCAN_PRIMARY_SOURCE") {
            match value.parse() {
                Ok(kind) => config.primary_source = kind,
                Err(e) => tracing::warn!("Ignoring SHELFSCAN_PRIMARY_SOURCE: {}", e),
            }
        }
        if let Some(value) = get("SHELFSCAN_SECONDARY_SOURCE") {
            if value.trim().eq_ignore_ascii_case("none") {
                config.secondary_source = None;
            } else {
                match value.parse() {
                    Ok(kind) => config.secondary_source = Some(kind),
                    Err(e) => tracing::warn!("Ignoring SHELFSCAN_SECONDARY_SOURCE: {}", e),
                }
            }
        }
        if let Some(key) = get("SHELFSCAN_GOOGLE_API_KEY") {
            config.google_api_key = Some(key);
        }
        if let Some(value) = get("SHELFSCAN_HTTP_TIMEOUT_SECS") {
            match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring SHELFSCAN_HTTP_TIMEOUT_SECS: '{}'", value),
            }
        }
        if let Some(value) = get("SHELFSCAN_ADDR") {
            match value.trim().parse() {
                Ok(addr) => config.server_addr = addr,
                Err(_) => tracing::warn!("Ignoring SHELFSCAN_ADDR: '{}'", value),
            }
        }
        if let Some(value) = get("SHELFSCAN_CORS_ORIGINS") {
            match value.parse() {
                Ok(origins) => config.cors_origins = Some(origins),
                Err(e) => tracing::warn!("Ignoring SHELFSCAN_CORS_ORIGINS: {}", e),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.storage_key, "bookList");
        assert_eq!(config.primary_source, SourceKind::GoogleBooks);
        assert_eq!(config.secondary_source, Some(SourceKind::OpenLibrary));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.data_dir.is_none());
        assert_eq!(config.server_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.cors_origins, None);
    }

    #[test]
    fn test_server_settings() {
        let config = config_from(&[
            ("SHELFSCAN_ADDR", "0.0.0.0:8080"),
            (
                "SHELFSCAN_CORS_ORIGINS",
                "https://shelf.example, http://localhost:5173",
            ),
        ]);
        assert_eq!(config.server_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(
            config.cors_origins,
            Some(CorsOrigins::List(vec![
                "https://shelf.example".to_string(),
                "http://localhost:5173".to_string(),
            ]))
        );

        let config = config_from(&[("SHELFSCAN_CORS_ORIGINS", "*"), ("SHELFSCAN_ADDR", "nope")]);
        assert_eq!(config.cors_origins, Some(CorsOrigins::Any));
        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SHELFSCAN_DATA_DIR", "/tmp/shelf"),
            ("SHELFSCAN_PRIMARY_SOURCE", "openlibrary"),
            ("SHELFSCAN_SECONDARY_SOURCE", "none"),
            ("SHELFSCAN_HTTP_TIMEOUT_SECS", "5"),
            ("SHELFSCAN_GOOGLE_API_KEY", "abc"),
        ]);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/shelf")));
        assert_eq!(config.primary_source, SourceKind::OpenLibrary);
        assert_eq!(config.secondary_source, None);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.google_api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = config_from(&[
            ("SHELFSCAN_PRIMARY_SOURCE", "amazon"),
            ("SHELFSCAN_HTTP_TIMEOUT_SECS", "0"),
            ("SHELFSCAN_STORAGE_KEY", "  "),
        ]);
        assert_eq!(config.primary_source, SourceKind::GoogleBooks);
        assert_eq!(config.http_timeout, DEFAULT_HTTP_TIMEOUT);
        assert_eq!(config.storage_key, "bookList");
    }
}
