//! Directory walk and granule aggregation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use granule_classifier::{classify, Classification, GranuleId};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::Granule;

/// Granules keyed (and therefore ordered) by id.
pub type Granules = BTreeMap<GranuleId, Granule>;

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("data directory not found: {0}")]
    NotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Walk `root` recursively and group every regular file into granules.
///
/// Unreadable entries below `root` are logged and skipped.
pub fn aggregate(root: &Path) -> Result<Granules, AggregateError> {
    if !root.exists() {
        return Err(AggregateError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(AggregateError::NotADirectory(root.to_path_buf()));
    }

    let files = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path());

    Ok(fold_paths(files))
}

/// Fold file paths into granules.
///
/// Paths are sorted first, so the result does not depend on the order they
/// are supplied in: duplicate kinds resolve to the lexicographically last
/// path and `others` lists come out sorted.
pub fn fold_paths<I>(paths: I) -> Granules
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut paths: Vec<PathBuf> = paths.into_iter().collect();
    paths.sort();

    let granules = paths.into_iter().fold(Granules::new(), observe);

    for granule in granules.values() {
        for (kind, path) in granule.displaced() {
            warn!(
                granule = %granule.id(),
                %kind,
                replaced = %path.display(),
                kept = %granule.path(*kind).map(|p| p.display().to_string()).unwrap_or_default(),
                "duplicate artifact; keeping the later path"
            );
        }
    }
    granules
}

fn observe(mut granules: Granules, path: PathBuf) -> Granules {
    let Some(filename) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
        warn!(path = %path.display(), "skipping non UTF-8 filename");
        return granules;
    };

    match classify(&filename) {
        Classification::Artifact { kind, granule } => {
            let updated = take(&mut granules, &granule).with_artifact(kind, path);
            granules.insert(granule, updated);
        }
        Classification::Unrecognized { granule } => {
            let updated = take(&mut granules, &granule).with_other(filename);
            granules.insert(granule, updated);
        }
        Classification::Dropped => {
            debug!(path = %path.display(), "file belongs to no granule");
        }
    }
    granules
}

fn take(granules: &mut Granules, id: &GranuleId) -> Granule {
    granules
        .remove(id)
        .unwrap_or_else(|| Granule::new(id.clone()))
}
