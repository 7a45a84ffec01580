//! Image-catalog collaborator and the catalog-upload workflow.
//!
//! - Catalog trait: create a collection, register one image asset
//! - EarthEngineCatalog: the `earthengine` CLI
//! - DryRunCatalog: logs the commands it would run
//!
//! [`workflow`] drives one bucket's worth of uploads through a
//! [`Catalog`] and an [`ObjectStore`](crate::store::ObjectStore).

mod asset;
pub mod workflow;

pub use asset::{AssetName, AssetNameError};
pub use workflow::{AssetError, AssetResult, AssetStatus, CatalogWorkflow, WorkflowError};

use std::io;

use chrono::NaiveDateTime;
use sidecar_metadata::PropertyMap;
use tracing::info;

use crate::command::{self, CommandOutcome};

/// Catalog timestamp format
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format an acquisition time for the catalog.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// One image registration.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogUpload {
    /// Object-store URL of the image.
    pub image: String,
    pub collection: String,
    pub asset_id: String,
    pub acquired: NaiveDateTime,
    pub properties: PropertyMap,
    pub nodata_value: i64,
    pub crs: String,
}

impl CatalogUpload {
    /// Catalog path of the asset, `collection/asset_id`.
    pub fn asset_path(&self) -> String {
        format!("{}/{}", self.collection.trim_end_matches('/'), self.asset_id)
    }
}

/// Catalog operations used by the workflow.
pub trait Catalog {
    fn create_collection(&self, collection: &str) -> Result<CommandOutcome, CatalogError>;

    fn upload(&self, upload: &CatalogUpload) -> Result<CommandOutcome, CatalogError>;
}

/// Catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Injected(String),
}

/// `earthengine` CLI backed catalog
#[derive(Debug, Clone)]
pub struct EarthEngineCatalog {
    program: String,
}

impl EarthEngineCatalog {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn create_args(collection: &str) -> Vec<String> {
        vec![
            "create".to_string(),
            "collection".to_string(),
            collection.to_string(),
        ]
    }

    pub fn upload_args(upload: &CatalogUpload) -> Vec<String> {
        let mut args = vec![
            "upload".to_string(),
            "image".to_string(),
            upload.image.clone(),
            "-f".to_string(),
            format!("--asset_id={}", upload.asset_path()),
            format!("--nodata_value={}", upload.nodata_value),
            format!("--crs={}", upload.crs),
            format!("--time_start={}", format_timestamp(&upload.acquired)),
        ];
        args.extend(upload.properties.to_args());
        args
    }

    fn spawn_error(&self, source: io::Error) -> CatalogError {
        CatalogError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl Catalog for EarthEngineCatalog {
    fn create_collection(&self, collection: &str) -> Result<CommandOutcome, CatalogError> {
        let args = Self::create_args(collection);
        info!(command = %command::render(&self.program, &args), "creating collection");
        command::run(&self.program, &args).map_err(|e| self.spawn_error(e))
    }

    fn upload(&self, upload: &CatalogUpload) -> Result<CommandOutcome, CatalogError> {
        let args = Self::upload_args(upload);
        info!(command = %command::render(&self.program, &args), "registering asset");
        command::run(&self.program, &args).map_err(|e| self.spawn_error(e))
    }
}

/// Logs each command instead of running it.
#[derive(Debug, Clone)]
pub struct DryRunCatalog {
    program: String,
}

impl DryRunCatalog {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Catalog for DryRunCatalog {
    fn create_collection(&self, collection: &str) -> Result<CommandOutcome, CatalogError> {
        let args = EarthEngineCatalog::create_args(collection);
        info!(command = %command::render(&self.program, &args), "dry run");
        Ok(CommandOutcome::Succeeded)
    }

    fn upload(&self, upload: &CatalogUpload) -> Result<CommandOutcome, CatalogError> {
        let args = EarthEngineCatalog::upload_args(upload);
        info!(command = %command::render(&self.program, &args), "dry run");
        Ok(CommandOutcome::Succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn upload() -> CatalogUpload {
        let acquired = NaiveDate::from_ymd_opt(2020, 10, 20)
            .unwrap()
            .and_hms_opt(16, 28, 47)
            .unwrap();
        let properties: PropertyMap = [("country", "Country Name"), ("cloudCover", "0.02")]
            .into_iter()
            .collect();
        CatalogUpload {
            image: "gs://planet-tti-8b/20201020_162847_94_2416_3B_AnalyticMS_SR_8b_harmonized_clip.tif"
                .to_string(),
            collection: "projects/p/assets/planet/".to_string(),
            asset_id: "20201020_162847_94_2416_3B_AnalyticMS_SR_8b_harmonized_clip".to_string(),
            acquired,
            properties,
            nodata_value: 0,
            crs: "EPSG:4326".to_string(),
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&upload().acquired), "2020-10-20T16:28:47");
    }

    #[test]
    fn test_upload_args() {
        let args = EarthEngineCatalog::upload_args(&upload());
        assert_eq!(
            args,
            vec![
                "upload",
                "image",
                "gs://planet-tti-8b/20201020_162847_94_2416_3B_AnalyticMS_SR_8b_harmonized_clip.tif",
                "-f",
                "--asset_id=projects/p/assets/planet/20201020_162847_94_2416_3B_AnalyticMS_SR_8b_harmonized_clip",
                "--nodata_value=0",
                "--crs=EPSG:4326",
                "--time_start=2020-10-20T16:28:47",
                "-p",
                "cloudCover=0.02",
                "-p",
                "country=Country_Name",
            ]
        );
    }

    #[test]
    fn test_create_args() {
        assert_eq!(
            EarthEngineCatalog::create_args("projects/p/assets/c"),
            vec!["create", "collection", "projects/p/assets/c"]
        );
    }

    #[test]
    fn test_dry_run_succeeds() {
        let catalog = DryRunCatalog::new("earthengine");
        assert!(catalog.create_collection("c").unwrap().is_success());
        assert!(catalog.upload(&upload()).unwrap().is_success());
    }
}
