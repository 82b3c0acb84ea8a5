//! Configuration management and validation.
//!
//! Provides configuration structures for the storage location, the HTTP
//! service, upload transport limits, query limits and session lifetime.
//! Configuration is layered: defaults, then an optional JSON file, then
//! environment variables, then command-line arguments.

use crate::constants::{
    APP_DIR_NAME, DEFAULT_BIND_ADDR, DEFAULT_DATABASE_FILE, DEFAULT_MAX_FILE_SIZE_BYTES,
    DEFAULT_MAX_FILES_PER_UPLOAD, DEFAULT_QUERY_LIMIT, DEFAULT_SESSION_TTL_SECS,
    FALLBACK_QUERY_LIMIT, MAX_QUERY_LIMIT,
};
use crate::error::{ObdError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variables consulted for the database location, in priority order
pub const DATABASE_PATH_ENV_VARS: &[&str] = &["OBD_DATABASE_PATH", "DATABASE_PATH"];

/// Environment variable consulted for the HTTP bind address
pub const BIND_ENV_VAR: &str = "OBD_BIND";

/// Global configuration for the ingestion service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObdConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// HTTP service settings
    pub server: ServerConfig,

    /// Upload transport limits
    pub upload: UploadLimits,

    /// Record query limits
    pub query: QueryLimits,

    /// Session settings
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Limits enforced on an upload request before any parsing happens
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct UploadLimits {
    /// Maximum size of any single uploaded file in bytes
    pub max_file_size_bytes: u64,

    /// Maximum number of files in one request
    pub max_files_per_upload: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            max_files_per_upload: DEFAULT_MAX_FILES_PER_UPLOAD,
        }
    }
}

impl UploadLimits {
    /// Total request body size the HTTP layer must accept to honour these limits
    pub fn max_request_bytes(&self) -> usize {
        let per_file = usize::try_from(self.max_file_size_bytes).unwrap_or(usize::MAX);
        per_file
            .saturating_mul(self.max_files_per_upload)
            // multipart framing overhead
            .saturating_add(64 * 1024)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct QueryLimits {
    /// Limit used when the caller does not ask for one
    pub default_limit: usize,

    /// Requested limits above this are clamped down to it
    pub max_limit: usize,

    /// Requested limits below 1 are replaced by this
    pub fallback_limit: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_QUERY_LIMIT,
            max_limit: MAX_QUERY_LIMIT,
            fallback_limit: FALLBACK_QUERY_LIMIT,
        }
    }
}

impl QueryLimits {
    /// Normalise a caller supplied limit
    pub fn effective_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.default_limit.min(self.max_limit),
            Some(limit) if limit < 1 => self.fallback_limit,
            Some(limit) => usize::try_from(limit)
                .unwrap_or(usize::MAX)
                .min(self.max_limit),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SessionConfig {
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl Default for ObdConfig {
    fn default() -> Self {
        Self {
            database_path: Self::default_database_path(),
            server: ServerConfig::default(),
            upload: UploadLimits::default(),
            query: QueryLimits::default(),
            session: SessionConfig::default(),
        }
    }
}

fn default_bind() -> SocketAddr {
    DEFAULT_BIND_ADDR
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 5000)))
}

impl ObdConfig {
    /// Default database location under the user data directory, falling back
    /// to the working directory when no data directory is known
    pub fn default_database_path() -> PathBuf {
        match dirs::data_dir() {
            Some(dir) => dir.join(APP_DIR_NAME).join(DEFAULT_DATABASE_FILE),
            None => PathBuf::from(DEFAULT_DATABASE_FILE),
        }
    }

    /// Load configuration from an optional JSON file, then apply the
    /// process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Read a JSON configuration file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ObdError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides using the supplied lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = DATABASE_PATH_ENV_VARS
            .iter()
            .find_map(|key| lookup(key).filter(|value| !value.trim().is_empty()))
        {
            self.database_path = PathBuf::from(path);
        }

        if let Some(bind) = lookup(BIND_ENV_VAR) {
            self.server.bind = bind.parse().map_err(|e| {
                ObdError::configuration(format!("{} is not a socket address: {}", BIND_ENV_VAR, e))
            })?;
        }

        Ok(self)
    }

    /// Override the database path
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Override the HTTP bind address
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.server.bind = bind;
        self
    }

    /// Override the upload limits
    pub fn with_upload_limits(mut self, upload: UploadLimits) -> Self {
        self.upload = upload;
        self
    }

    /// Check that all limits are usable
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ObdError::configuration("database_path cannot be empty"));
        }
        if self.upload.max_file_size_bytes == 0 {
            return Err(ObdError::configuration(
                "upload.max_file_size_bytes must be greater than 0",
            ));
        }
        if self.upload.max_files_per_upload == 0 {
            return Err(ObdError::configuration(
                "upload.max_files_per_upload must be greater than 0",
            ));
        }
        if self.query.max_limit == 0 || self.query.fallback_limit == 0 {
            return Err(ObdError::configuration(
                "query limits must be greater than 0",
            ));
        }
        if self.session.ttl_secs == 0 {
            return Err(ObdError::configuration(
                "session.ttl_secs must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ObdConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.upload.max_files_per_upload, 20);
        assert_eq!(config.upload.max_file_size_bytes, 50 * 1024 * 1024);
        assert_eq!(config.server.bind.port(), 5000);
        assert!(config.database_path.ends_with(DEFAULT_DATABASE_FILE));
    }

    #[test]
    fn test_loads_partial_json_file() {
        let dir = tempdir().expect("failed to create temp dir for test");
        let path = dir.path().join("obd.json");
        fs::write(
            &path,
            r#"{ "database_path": "/tmp/custom.db", "upload": { "max_files_per_upload": 3 } }"#,
        )
        .unwrap();

        let config = ObdConfig::from_file(&path).expect("config file should load");

        assert_eq!(config.database_path, PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.upload.max_files_per_upload, 3);
        assert_eq!(config.upload.max_file_size_bytes, DEFAULT_MAX_FILE_SIZE_BYTES);
    }

    #[test]
    fn test_unknown_nested_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("obd.json");
        fs::write(&path, r#"{ "upload": { "max_files": 3 } }"#).unwrap();

        assert!(ObdConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_env_overrides_take_priority_order() {
        let config = ObdConfig::default()
            .with_env_overrides(lookup_from(&[
                ("DATABASE_PATH", "/var/lib/legacy.db"),
                ("OBD_DATABASE_PATH", "/var/lib/obd.db"),
                ("OBD_BIND", "127.0.0.1:9999"),
            ]))
            .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/obd.db"));
        assert_eq!(config.server.bind, "127.0.0.1:9999".parse().unwrap());
    }

    #[test]
    fn test_legacy_database_env_var() {
        let config = ObdConfig::default()
            .with_env_overrides(lookup_from(&[("DATABASE_PATH", "legacy.db")]))
            .unwrap();
        assert_eq!(config.database_path, PathBuf::from("legacy.db"));
    }

    #[test]
    fn test_invalid_bind_env_is_configuration_error() {
        let result =
            ObdConfig::default().with_env_overrides(lookup_from(&[("OBD_BIND", "not-an-addr")]));
        assert!(matches!(result, Err(ObdError::Configuration { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = ObdConfig::default().with_upload_limits(UploadLimits {
            max_file_size_bytes: 0,
            max_files_per_upload: 20,
        });
        assert!(config.validate().is_err());

        let config = ObdConfig::default().with_database_path("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_query_limit() {
        let limits = QueryLimits::default();
        assert_eq!(limits.effective_limit(None), 1000);
        assert_eq!(limits.effective_limit(Some(5000)), 1000);
        assert_eq!(limits.effective_limit(Some(0)), 100);
        assert_eq!(limits.effective_limit(Some(-3)), 100);
        assert_eq!(limits.effective_limit(Some(42)), 42);
    }
}
