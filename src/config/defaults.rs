//! Built-in defaults (layer 1) and the typed settings they populate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Config file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "planet-upload.toml";

/// Fully merged settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Log commands instead of running them.
    pub dry_run: bool,
    pub store: StoreSettings,
    pub catalog: CatalogSettings,
}

/// Object store CLI and bucket naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSettings {
    pub program: String,
    /// URL scheme of destinations (`gs`).
    pub scheme: String,
    /// First component of every bucket name.
    pub prefix: String,
}

/// Image catalog CLI and asset registration defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSettings {
    pub program: String,
    pub nodata_value: i64,
    pub crs: String,
    /// Bucket objects whose file name matches this glob are registered.
    pub image_glob: String,
    /// Appended to when an image's XML sidecar cannot be found.
    pub missing_log: PathBuf,
    /// Attached to every registered asset, after sidecar properties.
    pub properties: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dry_run: false,
            store: StoreSettings::default(),
            catalog: CatalogSettings::default(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            program: "gcloud".to_string(),
            scheme: "gs".to_string(),
            prefix: "planet".to_string(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        let properties = [
            ("country", "country_name"),
            ("generator", "generator_name"),
            ("classifier", "classifier_name"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            program: "earthengine".to_string(),
            nodata_value: 0,
            crs: "EPSG:4326".to_string(),
            image_glob: "*.tif".to_string(),
            missing_log: PathBuf::from("missing_xml_files.log"),
            properties,
        }
    }
}

impl Settings {
    /// Defaults as a JSON value for merging.
    pub fn default_value() -> serde_json::Value {
        serde_json::json!({
            "dry_run": false,
            "store": {
                "program": "gcloud",
                "scheme": "gs",
                "prefix": "planet"
            },
            "catalog": {
                "program": "earthengine",
                "nodata_value": 0,
                "crs": "EPSG:4326",
                "image_glob": "*.tif",
                "missing_log": "missing_xml_files.log",
                "properties": {
                    "country": "country_name",
                    "generator": "generator_name",
                    "classifier": "classifier_name"
                }
            }
        })
    }
}
