//! Catalog upload of every image in one bucket.
//!
//! For each image: parse its name, locate its sidecars, merge their
//! properties with the configured static ones, and register the asset.
//! A missing XML sidecar aborts the run; any other per-image problem fails
//! only that image.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use serde::Serialize;
use sidecar_metadata::{extract, MetadataError, PropertyMap, SidecarSchema};
use tracing::{debug, error, info, info_span, warn};
use walkdir::WalkDir;

use super::asset::AssetName;
use super::{Catalog, CatalogError, CatalogUpload};
use crate::command::CommandOutcome;
use crate::config::CatalogSettings;
use crate::store::{ObjectStore, StoreError};

/// Errors that end a catalog run.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("sidecar directory not found: {0}")]
    SidecarDir(PathBuf),

    #[error("invalid image glob: {0}")]
    Glob(#[from] globset::Error),

    #[error("listing images failed: {0}")]
    List(#[from] StoreError),

    #[error("no XML sidecar {file} for granule {granule} under {dir}")]
    MissingSidecar {
        granule: String,
        file: String,
        dir: PathBuf,
        /// Images handled before the run stopped.
        completed: Vec<AssetResult>,
    },

    #[error("failed to append to {path}: {source}")]
    MissingLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why one image was not registered.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("upload exited with code {code:?}")]
    Exit { code: Option<i32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Uploaded,
    Failed,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Uploaded => "uploaded",
            AssetStatus::Failed => "failed",
        }
    }
}

/// Outcome for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetResult {
    pub asset_id: String,
    /// Empty when the image name could not be parsed.
    pub granule: String,
    pub status: AssetStatus,
}

/// Sidecar files under one directory, keyed by lowercased file name.
#[derive(Debug, Default)]
struct SidecarIndex {
    files: HashMap<String, PathBuf>,
}

impl SidecarIndex {
    fn build(dir: &Path) -> Self {
        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable sidecar entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();

        let mut files: HashMap<String, PathBuf> = HashMap::new();
        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let key = name.to_ascii_lowercase();
            if let Some(first) = files.get(&key) {
                warn!(kept = %first.display(), ignored = %path.display(), "duplicate sidecar name");
                continue;
            }
            files.insert(key, path);
        }
        debug!(count = files.len(), "indexed sidecars");
        Self { files }
    }

    fn find(&self, file_name: &str) -> Option<&Path> {
        self.files
            .get(&file_name.to_ascii_lowercase())
            .map(PathBuf::as_path)
    }
}

/// One catalog run's collaborators and settings.
pub struct CatalogWorkflow<'a> {
    store: &'a dyn ObjectStore,
    catalog: &'a dyn Catalog,
    settings: &'a CatalogSettings,
}

impl<'a> CatalogWorkflow<'a> {
    pub fn new(store: &'a dyn ObjectStore, catalog: &'a dyn Catalog, settings: &'a CatalogSettings) -> Self {
        Self {
            store,
            catalog,
            settings,
        }
    }

    /// Register every matching image in `bucket` into `collection`.
    pub fn run(
        &self,
        bucket: &str,
        collection: &str,
        sidecar_dir: &Path,
    ) -> Result<Vec<AssetResult>, WorkflowError> {
        if !sidecar_dir.is_dir() {
            return Err(WorkflowError::SidecarDir(sidecar_dir.to_path_buf()));
        }
        let matcher = Glob::new(&self.settings.image_glob)?.compile_matcher();

        self.ensure_collection(collection);

        let images = self.list_images(bucket, &matcher)?;
        info!(bucket, count = images.len(), "found images");

        let index = SidecarIndex::build(sidecar_dir);
        let mut results = Vec::with_capacity(images.len());
        for image in images {
            match self.process(&image, collection, sidecar_dir, &index) {
                Ok(result) => results.push(result),
                Err(mut e) => {
                    if let WorkflowError::MissingSidecar { completed, .. } = &mut e {
                        *completed = results;
                    }
                    return Err(e);
                }
            }
        }
        Ok(results)
    }

    fn ensure_collection(&self, collection: &str) {
        match self.catalog.create_collection(collection) {
            Ok(CommandOutcome::Succeeded) => info!(collection, "collection ready"),
            Ok(CommandOutcome::Failed { code }) => {
                warn!(collection, ?code, "create collection failed; it may already exist")
            }
            Err(e) => warn!(collection, error = %e, "create collection failed"),
        }
    }

    fn list_images(&self, bucket: &str, matcher: &GlobMatcher) -> Result<Vec<String>, StoreError> {
        let mut images: Vec<String> = self
            .store
            .list(bucket)?
            .into_iter()
            .filter(|url| matcher.is_match(file_name(url)))
            .collect();
        images.sort();
        Ok(images)
    }

    fn process(
        &self,
        image: &str,
        collection: &str,
        sidecar_dir: &Path,
        index: &SidecarIndex,
    ) -> Result<AssetResult, WorkflowError> {
        let span = info_span!("asset", image = file_name(image));
        let _guard = span.enter();

        let name = match AssetName::parse(image) {
            Ok(name) => name,
            Err(e) => {
                error!(error = %e, "cannot parse image name");
                return Ok(AssetResult {
                    asset_id: stem(image).to_string(),
                    granule: String::new(),
                    status: AssetStatus::Failed,
                });
            }
        };

        let xml_file = name.xml_sidecar();
        let Some(xml_path) = index.find(&xml_file) else {
            error!(file = %xml_file, dir = %sidecar_dir.display(), "xml file not found");
            self.log_missing(&name.granule, sidecar_dir)?;
            return Err(WorkflowError::MissingSidecar {
                granule: name.granule,
                file: xml_file,
                dir: sidecar_dir.to_path_buf(),
                completed: Vec::new(),
            });
        };
        debug!(path = %xml_path.display(), "found xml sidecar");

        let status = match self.register(image, collection, &name, xml_path, index) {
            Ok(()) => {
                info!(asset_id = %name.asset_id, "registered");
                AssetStatus::Uploaded
            }
            Err(e) => {
                error!(asset_id = %name.asset_id, error = %e, "registration failed");
                AssetStatus::Failed
            }
        };
        Ok(AssetResult {
            asset_id: name.asset_id,
            granule: name.granule,
            status,
        })
    }

    fn register(
        &self,
        image: &str,
        collection: &str,
        name: &AssetName,
        xml_path: &Path,
        index: &SidecarIndex,
    ) -> Result<(), AssetError> {
        let properties = self.properties(name, xml_path, index)?;
        let upload = CatalogUpload {
            image: image.to_string(),
            collection: collection.to_string(),
            asset_id: name.asset_id.clone(),
            acquired: name.acquired,
            properties,
            nodata_value: self.settings.nodata_value,
            crs: self.settings.crs.clone(),
        };
        match self.catalog.upload(&upload)? {
            CommandOutcome::Succeeded => Ok(()),
            CommandOutcome::Failed { code } => Err(AssetError::Exit { code }),
        }
    }

    /// XML properties, then JSON `properties` over them, then static ones.
    fn properties(
        &self,
        name: &AssetName,
        xml_path: &Path,
        index: &SidecarIndex,
    ) -> Result<PropertyMap, MetadataError> {
        let mut properties = extract(xml_path, SidecarSchema::PlanetXml)?;
        if let Some(json_path) = index.find(&name.json_sidecar()) {
            properties.extend(extract(json_path, SidecarSchema::PlanetJson)?);
        }
        for (key, value) in &self.settings.properties {
            properties.insert(key.as_str(), value);
        }
        Ok(properties)
    }

    fn log_missing(&self, granule: &str, sidecar_dir: &Path) -> Result<(), WorkflowError> {
        let path = &self.settings.missing_log;
        let io_err = |source| WorkflowError::MissingLog {
            path: path.clone(),
            source,
        };
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;
        writeln!(log, "missing_xml_file, {granule}, {}", sidecar_dir.display()).map_err(io_err)
    }
}

fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

fn stem(url: &str) -> &str {
    let name = file_name(url);
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}
