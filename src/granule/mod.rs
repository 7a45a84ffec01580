//! Granules: one acquisition's set of related files.
//!
//! A [`Granule`] is built by folding file observations into it (see
//! [`aggregate`]). Each observation returns a new snapshot; nothing outside
//! the fold holds a mutable reference to a granule while it is discovered.

mod aggregate;

pub use aggregate::{aggregate, fold_paths, AggregateError, Granules};

use granule_classifier::{ArtifactKind, GranuleId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const KIND_COUNT: usize = ArtifactKind::ALL.len();

/// Upload state of a granule within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// Discovered, not yet matched or dispatched.
    Pending,
    /// Every transfer of the matched profile succeeded.
    Uploaded,
    /// A transfer failed; earlier transfers of the same granule may have
    /// completed.
    Failed,
    /// No profile's required kinds are all present.
    Incomplete,
}

impl UploadStatus {
    /// Value of the report's `uploaded` column.
    pub fn uploaded_flag(&self) -> u8 {
        match self {
            UploadStatus::Uploaded => 1,
            _ => 0,
        }
    }
}

/// Which artifact kinds are present for a granule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presence([bool; KIND_COUNT]);

impl Presence {
    pub fn has(&self, kind: ArtifactKind) -> bool {
        self.0[kind.index()]
    }

    /// True when every kind in `kinds` is present.
    pub fn contains_all<I>(&self, kinds: I) -> bool
    where
        I: IntoIterator<Item = ArtifactKind>,
    {
        kinds.into_iter().all(|k| self.has(k))
    }
}

/// One acquisition and the files discovered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Granule {
    id: GranuleId,
    paths: [Option<PathBuf>; KIND_COUNT],
    others: Vec<String>,
    displaced: Vec<(ArtifactKind, PathBuf)>,
    status: UploadStatus,
}

impl Granule {
    pub fn new(id: GranuleId) -> Self {
        Self {
            id,
            paths: Default::default(),
            others: Vec::new(),
            displaced: Vec::new(),
            status: UploadStatus::Pending,
        }
    }

    pub fn id(&self) -> &GranuleId {
        &self.id
    }

    pub fn presence(&self) -> Presence {
        let mut flags = [false; KIND_COUNT];
        for (flag, path) in flags.iter_mut().zip(&self.paths) {
            *flag = path.is_some();
        }
        Presence(flags)
    }

    pub fn has(&self, kind: ArtifactKind) -> bool {
        self.paths[kind.index()].is_some()
    }

    /// Resolved path for `kind`, if one was discovered.
    pub fn path(&self, kind: ArtifactKind) -> Option<&Path> {
        self.paths[kind.index()].as_deref()
    }

    /// Filenames attributed to this granule that match no artifact rule.
    pub fn others(&self) -> &[String] {
        &self.others
    }

    /// Paths that were replaced by a later file of the same kind.
    pub fn displaced(&self) -> &[(ArtifactKind, PathBuf)] {
        &self.displaced
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    /// Record `path` as this granule's `kind`. A previously recorded path
    /// for the same kind is replaced and kept in [`Granule::displaced`].
    pub fn with_artifact(mut self, kind: ArtifactKind, path: PathBuf) -> Self {
        if let Some(previous) = self.paths[kind.index()].replace(path) {
            self.displaced.push((kind, previous));
        }
        self
    }

    pub fn with_other(mut self, filename: impl Into<String>) -> Self {
        self.others.push(filename.into());
        self
    }

    pub fn with_status(mut self, status: UploadStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_granule_is_empty() {
        let g = Granule::new(GranuleId::from("g"));
        assert_eq!(g.presence(), Presence::default());
        assert!(g.others().is_empty());
        assert_eq!(g.status(), UploadStatus::Pending);
    }

    #[test]
    fn test_with_artifact_sets_presence() {
        let g = Granule::new(GranuleId::from("g"))
            .with_artifact(ArtifactKind::QualityMask, PathBuf::from("/d/g_3B_udm2.tif"));
        assert!(g.has(ArtifactKind::QualityMask));
        assert!(!g.has(ArtifactKind::Analytic8b));
        assert_eq!(
            g.path(ArtifactKind::QualityMask),
            Some(Path::new("/d/g_3B_udm2.tif"))
        );
        assert!(g.presence().contains_all([ArtifactKind::QualityMask]));
        assert!(!g
            .presence()
            .contains_all([ArtifactKind::QualityMask, ArtifactKind::MetadataXml]));
    }

    #[test]
    fn test_duplicate_kind_last_wins_and_is_recorded() {
        let g = Granule::new(GranuleId::from("g"))
            .with_artifact(ArtifactKind::MetadataXml, PathBuf::from("/a/g.xml"))
            .with_artifact(ArtifactKind::MetadataXml, PathBuf::from("/b/g.xml"));
        assert_eq!(g.path(ArtifactKind::MetadataXml), Some(Path::new("/b/g.xml")));
        assert_eq!(
            g.displaced(),
            &[(ArtifactKind::MetadataXml, PathBuf::from("/a/g.xml"))]
        );
    }

    #[test]
    fn test_uploaded_flag() {
        assert_eq!(UploadStatus::Uploaded.uploaded_flag(), 1);
        assert_eq!(UploadStatus::Failed.uploaded_flag(), 0);
        assert_eq!(UploadStatus::Incomplete.uploaded_flag(), 0);
        assert_eq!(UploadStatus::Pending.uploaded_flag(), 0);
    }
}
