//! Classifier result types.

use crate::kind::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque acquisition identifier, the join key across artifact kinds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GranuleId(String);

impl GranuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GranuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GranuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GranuleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Outcome of classifying one filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classification {
    /// The filename fully matched one kind's rule.
    Artifact { kind: ArtifactKind, granule: GranuleId },

    /// No rule matched, but a granule id could be synthesized from the
    /// leading underscore segments.
    Unrecognized { granule: GranuleId },

    /// No rule matched and the name has too few segments to attribute.
    Dropped,
}

impl Classification {
    /// Granule this file belongs to, if any.
    pub fn granule(&self) -> Option<&GranuleId> {
        match self {
            Classification::Artifact { granule, .. } => Some(granule),
            Classification::Unrecognized { granule } => Some(granule),
            Classification::Dropped => None,
        }
    }

    /// Recognized kind, if any.
    pub fn kind(&self) -> Option<ArtifactKind> {
        match self {
            Classification::Artifact { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
