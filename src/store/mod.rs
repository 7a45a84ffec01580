//! Object-store collaborator.
//!
//! Abstracts the object-store CLI so the batch logic can run without one:
//! - ObjectStore trait: copy one file, list one bucket
//! - GcloudStore: `gcloud storage` for production
//! - DryRunStore: logs the commands it would run
//!
//! An in-memory implementation for tests lives in [`crate::mock`].

use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::command::{self, CommandOutcome};

/// Object-store operations used by the dispatcher and the catalog workflow.
pub trait ObjectStore {
    /// Copy `source` to the `destination` URL.
    fn copy(&self, source: &Path, destination: &str) -> Result<CommandOutcome, StoreError>;

    /// URLs of every object in `bucket`.
    fn list(&self, bucket: &str) -> Result<Vec<String>, StoreError>;
}

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("listing {bucket} failed with exit code {code:?}")]
    ListFailed { bucket: String, code: Option<i32> },

    #[error("source path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("{0}")]
    Injected(String),
}

/// `gcloud storage` backed store
#[derive(Debug, Clone)]
pub struct GcloudStore {
    program: String,
    scheme: String,
}

impl GcloudStore {
    pub fn new(program: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            scheme: scheme.into(),
        }
    }

    /// Arguments for one copy.
    pub fn copy_args(source: &Path, destination: &str) -> Result<Vec<String>, StoreError> {
        let source = source
            .to_str()
            .ok_or_else(|| StoreError::NonUtf8Path(source.display().to_string()))?;
        Ok(vec![
            "storage".to_string(),
            "cp".to_string(),
            source.to_string(),
            destination.to_string(),
        ])
    }

    fn list_args(&self, bucket: &str) -> Vec<String> {
        vec![
            "storage".to_string(),
            "ls".to_string(),
            format!("{}://{}/", self.scheme, bucket.trim_end_matches('/')),
        ]
    }
}

impl ObjectStore for GcloudStore {
    fn copy(&self, source: &Path, destination: &str) -> Result<CommandOutcome, StoreError> {
        let args = Self::copy_args(source, destination)?;
        info!(command = %command::render(&self.program, &args), "copying");
        command::run(&self.program, &args).map_err(|source| StoreError::Spawn {
            program: self.program.clone(),
            source,
        })
    }

    fn list(&self, bucket: &str) -> Result<Vec<String>, StoreError> {
        let args = self.list_args(bucket);
        let (outcome, stdout) =
            command::capture(&self.program, &args).map_err(|source| StoreError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        match outcome {
            CommandOutcome::Succeeded => Ok(stdout
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.ends_with('/'))
                .map(str::to_string)
                .collect()),
            CommandOutcome::Failed { code } => Err(StoreError::ListFailed {
                bucket: bucket.to_string(),
                code,
            }),
        }
    }
}

/// Logs each copy instead of performing it. Copies always succeed.
#[derive(Debug, Clone)]
pub struct DryRunStore {
    program: String,
}

impl DryRunStore {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ObjectStore for DryRunStore {
    fn copy(&self, source: &Path, destination: &str) -> Result<CommandOutcome, StoreError> {
        let args = GcloudStore::copy_args(source, destination)?;
        info!(command = %command::render(&self.program, &args), "dry run");
        Ok(CommandOutcome::Succeeded)
    }

    fn list(&self, bucket: &str) -> Result<Vec<String>, StoreError> {
        warn!(bucket, "dry run store cannot list buckets");
        Ok(Vec::new())
    }
}
