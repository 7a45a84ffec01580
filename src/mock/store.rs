//! Mock object store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::failure::{FailureConfig, FailureInjector, FailureMode};
use super::lock;
use crate::command::CommandOutcome;
use crate::store::{ObjectStore, StoreError};

/// One recorded copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCall {
    pub source: PathBuf,
    pub destination: String,
    /// Whether the copy reported success.
    pub succeeded: bool,
}

/// Records copies; successful ones become visible as objects.
///
/// Copying the same file name to the same destination twice overwrites,
/// like a real bucket.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    copies: Arc<Mutex<Vec<CopyCall>>>,
    objects: Arc<Mutex<BTreeMap<String, Vec<String>>>>,
    listings: Arc<Mutex<BTreeMap<String, Vec<String>>>>,
    failures: Arc<Mutex<FailureInjector>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call whose subject contains `matcher`.
    pub fn fail_on(&self, matcher: impl Into<String>, mode: FailureMode) {
        self.inject(matcher, FailureConfig::new(mode));
    }

    pub fn inject(&self, matcher: impl Into<String>, config: FailureConfig) {
        lock(&self.failures).inject(matcher, config);
    }

    /// Serve `urls` when `bucket` is listed.
    pub fn set_listing<I, S>(&self, bucket: &str, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.listings).insert(bucket.to_string(), urls.into_iter().map(Into::into).collect());
    }

    /// Every copy attempted, in call order.
    pub fn copies(&self) -> Vec<CopyCall> {
        lock(&self.copies).clone()
    }

    /// File names stored under `destination`, sorted.
    pub fn objects(&self, destination: &str) -> Vec<String> {
        lock(&self.objects)
            .get(destination)
            .cloned()
            .unwrap_or_default()
    }
}

impl ObjectStore for MockStore {
    fn copy(&self, source: &Path, destination: &str) -> Result<CommandOutcome, StoreError> {
        let failure = lock(&self.failures).check(&source.to_string_lossy());
        let outcome = match failure {
            Some(FailureMode::Error(message)) => {
                lock(&self.copies).push(CopyCall {
                    source: source.to_path_buf(),
                    destination: destination.to_string(),
                    succeeded: false,
                });
                return Err(StoreError::Injected(message));
            }
            Some(FailureMode::Exit(code)) => CommandOutcome::Failed { code: Some(code) },
            None => CommandOutcome::Succeeded,
        };

        lock(&self.copies).push(CopyCall {
            source: source.to_path_buf(),
            destination: destination.to_string(),
            succeeded: outcome.is_success(),
        });
        if outcome.is_success() {
            if let Some(name) = source.file_name() {
                let name = name.to_string_lossy().into_owned();
                let mut objects = lock(&self.objects);
                let stored = objects.entry(destination.to_string()).or_default();
                if let Err(at) = stored.binary_search(&name) {
                    stored.insert(at, name);
                }
            }
        }
        Ok(outcome)
    }

    fn list(&self, bucket: &str) -> Result<Vec<String>, StoreError> {
        match lock(&self.failures).check(bucket) {
            Some(FailureMode::Error(message)) => return Err(StoreError::Injected(message)),
            Some(FailureMode::Exit(code)) => {
                return Err(StoreError::ListFailed {
                    bucket: bucket.to_string(),
                    code: Some(code),
                })
            }
            None => {}
        }
        Ok(lock(&self.listings).get(bucket).cloned().unwrap_or_default())
    }
}
