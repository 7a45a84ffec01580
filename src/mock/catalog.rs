//! Mock image catalog

use std::sync::{Arc, Mutex};

use super::failure::{FailureConfig, FailureInjector, FailureMode};
use super::lock;
use crate::catalog::{Catalog, CatalogError, CatalogUpload};
use crate::command::CommandOutcome;

/// Records every call; uploads are checked against injected failures by
/// asset id, collection creation by collection id.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    collections: Arc<Mutex<Vec<String>>>,
    uploads: Arc<Mutex<Vec<CatalogUpload>>>,
    failures: Arc<Mutex<FailureInjector>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, matcher: impl Into<String>, mode: FailureMode) {
        lock(&self.failures).inject(matcher, FailureConfig::new(mode));
    }

    pub fn collections(&self) -> Vec<String> {
        lock(&self.collections).clone()
    }

    /// Every upload attempted, in call order.
    pub fn uploads(&self) -> Vec<CatalogUpload> {
        lock(&self.uploads).clone()
    }

    fn outcome(&self, subject: &str) -> Result<CommandOutcome, CatalogError> {
        match lock(&self.failures).check(subject) {
            Some(FailureMode::Error(message)) => Err(CatalogError::Injected(message)),
            Some(FailureMode::Exit(code)) => Ok(CommandOutcome::Failed { code: Some(code) }),
            None => Ok(CommandOutcome::Succeeded),
        }
    }
}

impl Catalog for MockCatalog {
    fn create_collection(&self, collection: &str) -> Result<CommandOutcome, CatalogError> {
        lock(&self.collections).push(collection.to_string());
        self.outcome(collection)
    }

    fn upload(&self, upload: &CatalogUpload) -> Result<CommandOutcome, CatalogError> {
        lock(&self.uploads).push(upload.clone());
        self.outcome(&upload.asset_id)
    }
}
