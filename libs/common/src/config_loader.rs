//! Configuration loading with figment
//!
//! Priority (highest to lowest):
//! 1. Environment variables (prefixed, `__` separates nested keys)
//! 2. The configuration file, selected by extension
//! 3. `Default` values of the target type

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

fn file_figment(path: &Path) -> Result<Figment> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Config("Config file must have an extension".to_string()))?;

    match extension {
        "toml" => Ok(Figment::new().merge(Toml::file(path))),
        "yaml" | "yml" => Ok(Figment::new().merge(Yaml::file(path))),
        "json" => Ok(Figment::new().merge(Json::file(path))),
        _ => Err(Error::Config(format!(
            "Unsupported config file format: {}",
            extension
        ))),
    }
}

/// Load configuration from defaults, an optional file and prefixed environment variables
///
/// A missing file is not an error; the defaults and environment still apply.
pub fn load_layered<T>(path: Option<&Path>, env_prefix: &str) -> Result<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Default,
{
    let mut figment = Figment::from(Serialized::defaults(T::default()));

    if let Some(path) = path {
        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            figment = figment.merge(file_figment(path)?);
        } else {
            debug!("Config file {} not found, using defaults", path.display());
        }
    }

    figment
        .merge(Env::prefixed(env_prefix).split("__"))
        .extract()
        .map_err(|e| Error::Config(format!("Failed to load configuration: {}", e)))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct TestConfig {
        name: String,
        port: u16,
        #[serde(default)]
        nested: NestedConfig,
    }

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct NestedConfig {
        enabled: bool,
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.yaml");
        std::fs::write(&path, "name: ess\nport: 161\nnested:\n  enabled: true\n").unwrap();

        let config: TestConfig = load_layered(Some(&path), "COMMON_TEST_UNUSED_").unwrap();
        assert_eq!(config.name, "ess");
        assert_eq!(config.port, 161);
        assert!(config.nested.enabled);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.ini");
        std::fs::write(&path, "name=ess").unwrap();

        let result: Result<TestConfig> = load_layered(Some(&path), "COMMON_TEST_UNUSED_");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("essrv");
        std::fs::write(&path, "name: ess").unwrap();

        let result: Result<TestConfig> = load_layered(Some(&path), "COMMON_TEST_UNUSED_");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_layered_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yaml");

        let config: TestConfig = load_layered(Some(&path), "COMMON_TEST_UNUSED_").unwrap();
        assert_eq!(config, TestConfig::default());
    }

    #[test]
    fn test_layered_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layered.json");
        std::fs::write(&path, r#"{"name": "layered", "port": 1161}"#).unwrap();

        let config: TestConfig = load_layered(Some(&path), "COMMON_TEST_UNUSED_").unwrap();
        assert_eq!(config.name, "layered");
        assert_eq!(config.port, 1161);
        assert!(!config.nested.enabled);
    }
}
