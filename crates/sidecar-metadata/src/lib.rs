//! Property extraction from vendor sidecar files.
//!
//! A sidecar (XML or JSON) is reduced to a flat [`PropertyMap`] whose
//! values are safe to pass as single command-line tokens.

mod error;
pub mod json;
pub mod xml;

pub use error::MetadataError;
pub use xml::{Lookup, PLANET_LOOKUPS};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Value recorded when a lookup matches nothing.
pub const MISSING_VALUE: &str = "None";

/// Supported sidecar formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidecarSchema {
    /// Namespaced vendor XML, read with [`PLANET_LOOKUPS`].
    PlanetXml,
    /// JSON with a top-level `properties` object.
    PlanetJson,
}

impl SidecarSchema {
    /// Infer the schema from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, MetadataError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xml") => Ok(SidecarSchema::PlanetXml),
            Some("json") => Ok(SidecarSchema::PlanetJson),
            _ => Err(MetadataError::UnknownSchema(path.to_path_buf())),
        }
    }
}

/// Property name to value. Keys are unique (last write wins) and values are
/// normalized on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: BTreeMap<String, String>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: &str) {
        self.entries.insert(key.into(), normalize_value(value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn extend(&mut self, other: PropertyMap) {
        self.entries.extend(other.entries);
    }

    /// `-p key=value` token pairs in key order.
    pub fn to_args(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(k, v)| ["-p".to_string(), format!("{k}={v}")])
            .collect()
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (k, v) in iter {
            map.insert(k, v.as_ref());
        }
        map
    }
}

/// Trim and replace internal whitespace with underscores.
pub fn normalize_value(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// True when `key` can stand on the left of a `-p key=value` token.
pub fn is_property_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(char::is_whitespace) && !key.contains('=')
}

/// Read one sidecar file into a property map.
pub fn extract(path: &Path, schema: SidecarSchema) -> Result<PropertyMap, MetadataError> {
    let content = fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let props = match schema {
        SidecarSchema::PlanetXml => xml::extract_xml(&content, PLANET_LOOKUPS)?,
        SidecarSchema::PlanetJson => json::extract_json(&content)?,
    };
    tracing::debug!(path = %path.display(), count = props.len(), "extracted sidecar properties");
    Ok(props)
}
