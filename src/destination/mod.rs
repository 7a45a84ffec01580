//! Destination naming for object-store transfers.
//!
//! A destination is `<scheme>://<prefix>-<site>-<category>`, for example
//! `gs://planet-st_andrews-masks`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::Category;

/// Errors while building a destination identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DestinationError {
    /// A component is empty
    #[error("destination {field} is empty")]
    Empty { field: &'static str },

    /// A component contains a character that would change the URL structure
    #[error("invalid character {ch:?} in destination {field} '{value}'")]
    InvalidCharacter {
        field: &'static str,
        value: String,
        ch: char,
    },
}

/// Store scheme, bucket prefix, and the region-of-interest (site) code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationConfig {
    pub scheme: String,
    pub prefix: String,
    pub site: String,
}

impl DestinationConfig {
    pub fn new(scheme: impl Into<String>, prefix: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            prefix: prefix.into(),
            site: site.into(),
        }
    }

    /// Check every component without building a destination.
    pub fn validate(&self) -> Result<(), DestinationError> {
        check_component("scheme", &self.scheme)?;
        check_component("prefix", &self.prefix)?;
        check_component("site", &self.site)?;
        Ok(())
    }

    /// Bucket name for `category`, without the scheme.
    pub fn bucket(&self, category: Category) -> Result<String, DestinationError> {
        check_component("prefix", &self.prefix)?;
        check_component("site", &self.site)?;
        Ok(format!("{}-{}-{}", self.prefix, self.site, category.as_str()))
    }

    /// Full destination URL for `category`.
    pub fn resolve(&self, category: Category) -> Result<String, DestinationError> {
        check_component("scheme", &self.scheme)?;
        Ok(format!("{}://{}", self.scheme, self.bucket(category)?))
    }
}

fn check_component(field: &'static str, value: &str) -> Result<(), DestinationError> {
    if value.is_empty() {
        return Err(DestinationError::Empty { field });
    }
    if let Some(ch) = value
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | ':' | '*' | '?'))
    {
        return Err(DestinationError::InvalidCharacter {
            field,
            value: value.to_string(),
            ch,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(site: &str) -> DestinationConfig {
        DestinationConfig::new("gs", "planet", site)
    }

    #[test]
    fn test_resolve() {
        let c = config("st_andrews");
        assert_eq!(c.resolve(Category::Imagery).unwrap(), "gs://planet-st_andrews-8b");
        assert_eq!(
            c.resolve(Category::ImageryUnharmonized).unwrap(),
            "gs://planet-st_andrews-8b-unharmonized"
        );
        assert_eq!(c.resolve(Category::Masks).unwrap(), "gs://planet-st_andrews-masks");
        assert_eq!(c.bucket(Category::Metadata).unwrap(), "planet-st_andrews-metadata");
    }

    #[test]
    fn test_empty_site_rejected() {
        let err = config("").resolve(Category::Masks).unwrap_err();
        assert_eq!(err, DestinationError::Empty { field: "site" });
    }

    #[test]
    fn test_malformed_site_rejected() {
        for bad in ["tti fl", "a/b", "x:y"] {
            let err = config(bad).resolve(Category::Masks).unwrap_err();
            assert!(
                matches!(err, DestinationError::InvalidCharacter { field: "site", .. }),
                "{bad}"
            );
        }
        assert!(config("tti").validate().is_ok());
        assert!(config("t i").validate().is_err());
    }
}
