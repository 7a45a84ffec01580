//! Planet granule upload
//!
//! Groups vendor imagery files into granules, decides which upload
//! profile each granule satisfies, and copies complete granules to the
//! object store. A second workflow registers uploaded images in the image
//! catalog with properties read from their sidecar files.

pub mod catalog;
pub mod command;
pub mod config;
pub mod destination;
pub mod dispatch;
pub mod exit;
pub mod granule;
pub mod logging;
pub mod mock;
pub mod profile;
pub mod report;
pub mod store;

pub use catalog::{Catalog, CatalogUpload, CatalogWorkflow, DryRunCatalog, EarthEngineCatalog};
pub use config::{EffectiveConfig, Settings};
pub use destination::DestinationConfig;
pub use dispatch::{dispatch, run_batch, BatchEntry, DispatchOutcome};
pub use exit::ExitCode;
pub use granule::{aggregate, Granule, Granules, UploadStatus};
pub use profile::{match_profile, UploadProfile};
pub use store::{DryRunStore, GcloudStore, ObjectStore};

pub use granule_classifier::{classify, ArtifactKind, Classification, GranuleId};
pub use sidecar_metadata::PropertyMap;
