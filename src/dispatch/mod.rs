//! Upload dispatch: turn matched granules into transfers.
//!
//! Transfers for one granule run strictly in the profile's order. The first
//! failing transfer stops that granule; nothing already copied is undone.
//! A failure never stops the batch.

use granule_classifier::{ArtifactKind, GranuleId};
use tracing::{error, info, info_span, warn};

use crate::command::CommandOutcome;
use crate::destination::{DestinationConfig, DestinationError};
use crate::granule::{Granule, Granules, UploadStatus};
use crate::profile::{match_profile, Category, UploadProfile};
use crate::store::{ObjectStore, StoreError};

/// Why a single transfer did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("exit code {code:?}")]
    Exit { code: Option<i32> },

    #[error("no {0} file recorded")]
    MissingArtifact(ArtifactKind),

    #[error(transparent)]
    Destination(#[from] DestinationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of dispatching one granule.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub profile: UploadProfile,
    /// Transfers that completed before the outcome was decided.
    pub completed: usize,
    /// The failing step and its error, if any.
    pub failure: Option<(ArtifactKind, TransferError)>,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn status(&self) -> UploadStatus {
        if self.is_success() {
            UploadStatus::Uploaded
        } else {
            UploadStatus::Failed
        }
    }
}

/// Issue one transfer per step of `profile`, stopping at the first failure.
pub fn dispatch(
    granule: &Granule,
    profile: UploadProfile,
    destinations: &DestinationConfig,
    store: &dyn ObjectStore,
) -> DispatchOutcome {
    let mut completed = 0;
    for step in profile.steps() {
        match transfer(granule, step.kind, step.category, destinations, store) {
            Ok(()) => completed += 1,
            Err(e) => {
                error!(granule = %granule.id(), kind = %step.kind, error = %e, "transfer failed");
                return DispatchOutcome {
                    profile,
                    completed,
                    failure: Some((step.kind, e)),
                };
            }
        }
    }
    DispatchOutcome {
        profile,
        completed,
        failure: None,
    }
}

fn transfer(
    granule: &Granule,
    kind: ArtifactKind,
    category: Category,
    destinations: &DestinationConfig,
    store: &dyn ObjectStore,
) -> Result<(), TransferError> {
    let source = granule
        .path(kind)
        .ok_or(TransferError::MissingArtifact(kind))?;
    let destination = destinations.resolve(category)?;
    match store.copy(source, &destination)? {
        CommandOutcome::Succeeded => Ok(()),
        CommandOutcome::Failed { code } => Err(TransferError::Exit { code }),
    }
}

/// Per-granule record of a batch run.
#[derive(Debug)]
pub struct BatchEntry {
    pub granule: Granule,
    pub outcome: Option<DispatchOutcome>,
}

/// Match and dispatch every granule in id order.
pub fn run_batch(
    granules: Granules,
    destinations: &DestinationConfig,
    store: &dyn ObjectStore,
) -> Vec<BatchEntry> {
    granules
        .into_values()
        .map(|granule| dispatch_one(granule, destinations, store))
        .collect()
}

fn dispatch_one(granule: Granule, destinations: &DestinationConfig, store: &dyn ObjectStore) -> BatchEntry {
    let span = info_span!("granule", id = %granule.id());
    let _guard = span.enter();

    let Some(profile) = match_profile(&granule) else {
        warn!("missing too many files");
        return BatchEntry {
            granule: granule.with_status(UploadStatus::Incomplete),
            outcome: None,
        };
    };

    info!(%profile, "matched profile");
    let outcome = dispatch(&granule, profile, destinations, store);
    if outcome.is_success() {
        info!(transfers = outcome.completed, "uploaded");
    } else {
        warn!(
            completed = outcome.completed,
            total = profile.steps().len(),
            "partial upload"
        );
    }
    BatchEntry {
        granule: granule.with_status(outcome.status()),
        outcome: Some(outcome),
    }
}

/// Ids of granules whose status is `status`.
pub fn ids_with_status(entries: &[BatchEntry], status: UploadStatus) -> Vec<&GranuleId> {
    entries
        .iter()
        .filter(|e| e.granule.status() == status)
        .map(|e| e.granule.id())
        .collect()
}
