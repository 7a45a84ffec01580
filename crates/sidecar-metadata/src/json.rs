//! JSON sidecars: the top-level `properties` object.
//!
//! Keys are trimmed and inner whitespace becomes `_`; keys that still
//! cannot form a `-p key=value` token are skipped.

use serde_json::Value;
use tracing::warn;

use crate::{is_property_key, normalize_value, MetadataError, PropertyMap, MISSING_VALUE};

/// Top-level key holding the item properties.
pub const PROPERTIES_KEY: &str = "properties";

/// Read `properties` from a JSON document. A document without the key
/// yields an empty map.
pub fn extract_json(json: &str) -> Result<PropertyMap, MetadataError> {
    let doc: Value = serde_json::from_str(json)?;
    let Value::Object(top) = doc else {
        return Err(MetadataError::NotAnObject("$"));
    };

    let mut props = PropertyMap::new();
    match top.get(PROPERTIES_KEY) {
        None => {}
        Some(Value::Object(properties)) => {
            for (key, value) in properties {
                let key = normalize_value(key);
                if !is_property_key(&key) {
                    warn!(key = %key, "skipping property with unusable key");
                    continue;
                }
                props.insert(key, &stringify(value));
            }
        }
        Some(_) => return Err(MetadataError::NotAnObject(PROPERTIES_KEY)),
    }
    Ok(props)
}

/// Render a JSON value as a bare string: strings unquoted, `null` as the
/// missing sentinel, everything else in compact JSON form.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => MISSING_VALUE.to_string(),
        other => other.to_string(),
    }
}
