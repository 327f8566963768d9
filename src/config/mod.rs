//! Configuration for the paste service.
//!
//! The service is configured via a TOML file, with support for environment
//! variable interpolation using `${VAR_NAME}` syntax.
//!
//! # Example
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! type = "sqlite"
//! path = "gisty.db"
//! ```

mod cache;
mod database;
mod kgs;
mod limits;
mod observability;
mod reaper;
mod server;
mod storage;

use std::path::Path;

pub use cache::*;
pub use database::*;
pub use kgs::*;
pub use limits::*;
pub use observability::*;
pub use reaper::*;
use serde::{Deserialize, Serialize};
pub use server::*;
pub use storage::*;

/// Root configuration for the paste service.
///
/// All sections are optional with sensible defaults, so a minimal or even
/// empty configuration file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Metadata index configuration (the authoritative paste store).
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Hot-path cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Compressed blob store configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Key Generation Service configuration.
    #[serde(default)]
    pub kgs: KgsConfig,

    /// Expired-paste reaper configuration.
    #[serde(default)]
    pub reaper: ReaperConfig,

    /// Request size limits and rate limiting.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing required variables will cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;
        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let mut config: AppConfig = toml::from_str(&expanded).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        if self.kgs.key_length == 0 || self.kgs.key_length > 32 {
            return Err(ConfigError::Validation(
                "kgs.key_length must be between 1 and 32".into(),
            ));
        }
        if self.limits.max_content_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits.max_content_bytes must be greater than zero".into(),
            ));
        }
        self.database.validate()?;
        Ok(())
    }

    /// Generate the JSON schema for the configuration file.
    #[cfg(feature = "json-schema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AppConfig)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            storage: StorageConfig::default(),
            kgs: KgsConfig::default(),
            reaper: ReaperConfig::default(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Expand `${VAR_NAME}` references against the process environment.
fn expand_env_vars(contents: &str) -> Result<String, ConfigError> {
    let re = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    let mut missing: Option<String> = None;
    let expanded = re.replace_all(contents, |caps: &regex::Captures| {
        let name = &caps[1];
        match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });
    if let Some(name) = missing {
        return Err(ConfigError::EnvVarNotFound(name));
    }
    Ok(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_from_empty_string() {
        let config = AppConfig::from_str("").unwrap();
        assert_eq!(config.kgs.key_length, 6);
        assert_eq!(config.limits.max_content_bytes, 1024 * 1024);
    }

    #[test]
    fn env_var_expansion() {
        // SAFETY: test-only, single-threaded mutation of a process-local env var.
        unsafe {
            std::env::set_var("GISTY_TEST_HOST", "example.internal");
        }
        let toml = r#"
            [server]
            host = "${GISTY_TEST_HOST}"
        "#;
        let config = AppConfig::from_str(toml).unwrap();
        assert_eq!(config.server.host, "example.internal");
    }

    #[test]
    fn missing_env_var_errors() {
        let toml = r#"
            [server]
            host = "${GISTY_DEFINITELY_UNSET_VAR}"
        "#;
        let err = AppConfig::from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound(_)));
    }

    #[test]
    fn rejects_invalid_key_length() {
        let toml = "[kgs]\nkey_length = 0\n";
        let err = AppConfig::from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
