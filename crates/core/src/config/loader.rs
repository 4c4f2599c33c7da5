//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "BITZY_CONFIG";

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path (argument, then `BITZY_CONFIG`) must exist. Without
    /// one, the standard locations are searched and defaults apply when
    /// nothing is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let config_path = match explicit {
            Some(p) if !p.exists() => return Err(Error::config_not_found(&p)),
            Some(p) => Some(p),
            None => find_config_file(),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        schema
            .validate()
            .context(format!("Validating {}", display_path(config_path.as_deref())))?;

        tracing::debug!(path = %display_path(config_path.as_deref()), "Configuration loaded");

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&self.schema)?)
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string())
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from("bitzy.toml"), PathBuf::from(".bitzy.toml")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("bitzy").join("config.toml"));
    }

    candidates.into_iter().find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {e}", path.display())))?;

    toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("Parsing config file {}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert!(config.path.is_none());
        assert_eq!(config.schema.service_area.radius_km, 10.0);
    }

    #[test]
    fn test_config_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bitzy.toml");
        std::fs::write(&path, "[location]\ncache_ttl_secs = 60\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
        assert_eq!(config.schema.location.cache_ttl_secs, 60);
    }

    #[test]
    fn test_config_load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bitzy.toml");
        std::fs::write(&path, "[search]\ndebounce_ms = 10\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigValidationError);
        assert!(err.context.is_some());
    }

    #[test]
    fn test_config_load_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bitzy.toml");
        std::fs::write(&path, "[search\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_to_toml_round_trips_values() {
        let config = Config::defaults();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[service_area]"));
        assert!(rendered.contains("cache_key = \"bitzy:location\""));
    }
}
