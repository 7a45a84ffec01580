//! Effective configuration with provenance
//!
//! Records the merged configuration, the typed settings read from it, and
//! where each contributing layer came from.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sidecar_metadata::is_property_key;

use super::defaults::Settings;
use super::merge::merge_layers;
use crate::destination::DestinationConfig;

/// Origin of a configuration source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing config source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged configuration and its sources
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub settings: Settings,
    /// The merged configuration object
    pub merged: Value,
    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build from the built-in defaults, an optional TOML file, and CLI
    /// overrides.
    pub fn build(config_path: Option<&Path>, cli_overrides: Option<Value>) -> Result<Self, ConfigError> {
        let mut layers = vec![Settings::default_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        if let Some(path) = config_path {
            let (value, digest) = load_toml_file(path)?;
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let settings: Settings = serde_json::from_value(merged.clone())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        validate(&settings)?;

        Ok(Self {
            settings,
            merged,
            sources,
        })
    }
}

/// Load and parse a TOML file, returning the value and digest
fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let digest = hex::encode(Sha256::digest(&bytes));

    let contents = String::from_utf8(bytes).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: format!("invalid UTF-8: {e}"),
    })?;
    let toml_value: toml::Value = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok((toml_to_json(toml_value), digest))
}

fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.store.program.trim().is_empty() {
        return Err(ConfigError::Invalid("store.program must not be empty".to_string()));
    }
    if settings.catalog.program.trim().is_empty() {
        return Err(ConfigError::Invalid("catalog.program must not be empty".to_string()));
    }
    if settings.catalog.crs.trim().is_empty() {
        return Err(ConfigError::Invalid("catalog.crs must not be empty".to_string()));
    }

    // Any well-formed site completes a valid destination.
    DestinationConfig::new(&settings.store.scheme, &settings.store.prefix, "site")
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("store: {e}")))?;

    globset::Glob::new(&settings.catalog.image_glob)
        .map_err(|e| ConfigError::Invalid(format!("catalog.image_glob: {e}")))?;

    if let Some((key, _)) = settings
        .catalog
        .properties
        .iter()
        .find(|(k, _)| !is_property_key(k))
    {
        return Err(ConfigError::Invalid(format!(
            "catalog.properties key {key:?} is not a single token"
        )));
    }
    Ok(())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_with_defaults_only() {
        let config = EffectiveConfig::build(None, None).unwrap();
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
        assert_eq!(config.merged["store"]["scheme"], Value::from("gs"));
    }

    #[test]
    fn test_cli_override_wins() {
        let cli = serde_json::json!({"dry_run": true, "store": {"prefix": "vendor"}});
        let config = EffectiveConfig::build(None, Some(cli)).unwrap();
        assert!(config.settings.dry_run);
        assert_eq!(config.settings.store.prefix, "vendor");
        assert_eq!(config.settings.store.program, "gcloud");
        assert_eq!(config.sources.last().unwrap().origin, ConfigOrigin::Cli);
    }

    #[test]
    fn test_load_toml_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[catalog]").unwrap();
        writeln!(temp, "nodata_value = -9999").unwrap();
        writeln!(temp, "[catalog.properties]").unwrap();
        writeln!(temp, "country = \"Tanzania\"").unwrap();

        let config = EffectiveConfig::build(Some(temp.path()), None).unwrap();
        assert_eq!(config.settings.catalog.nodata_value, -9999);
        assert_eq!(config.settings.catalog.properties["country"], "Tanzania");
        assert_eq!(config.settings.catalog.properties["generator"], "generator_name");

        let source = &config.sources[1];
        assert_eq!(source.origin, ConfigOrigin::File);
        assert_eq!(source.digest.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let cli = serde_json::json!({"store": {"bucket": "x"}});
        let err = EffectiveConfig::build(None, Some(cli)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_prefix_rejected() {
        let cli = serde_json::json!({"store": {"prefix": "has space"}});
        let err = EffectiveConfig::build(None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("store"));
    }

    #[test]
    fn test_bad_glob_rejected() {
        let cli = serde_json::json!({"catalog": {"image_glob": "[unclosed"}});
        let err = EffectiveConfig::build(None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("image_glob"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EffectiveConfig::build(Some(Path::new("/nonexistent/planet.toml")), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[store").unwrap();
        let err = EffectiveConfig::build(Some(temp.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
