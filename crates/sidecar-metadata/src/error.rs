//! Metadata extraction errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to read sidecar {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object at '{0}'")]
    NotAnObject(&'static str),

    #[error("lookup uses undeclared namespace prefix '{0}'")]
    UnknownPrefix(String),

    #[error("cannot infer sidecar schema from {0}")]
    UnknownSchema(PathBuf),
}
