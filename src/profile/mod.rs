//! Upload profiles: which artifact sets qualify a granule for upload and
//! where each artifact goes.

use granule_classifier::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::granule::{Granule, Presence};

/// Destination category, the last component of a bucket name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Harmonized imagery.
    #[serde(rename = "8b")]
    Imagery,
    /// Unharmonized imagery.
    #[serde(rename = "8b-unharmonized")]
    ImageryUnharmonized,
    #[serde(rename = "masks")]
    Masks,
    #[serde(rename = "metadata")]
    Metadata,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Imagery => "8b",
            Category::ImageryUnharmonized => "8b-unharmonized",
            Category::Masks => "masks",
            Category::Metadata => "metadata",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transfer of a profile: the artifact and its destination category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferStep {
    pub kind: ArtifactKind,
    pub category: Category,
}

const fn step(kind: ArtifactKind, category: Category) -> TransferStep {
    TransferStep { kind, category }
}

const CSDA_UNHARMONIZED: &[TransferStep] = &[
    step(ArtifactKind::Analytic8b, Category::ImageryUnharmonized),
    step(ArtifactKind::QualityMask, Category::Masks),
    step(ArtifactKind::MetadataJson, Category::Metadata),
    step(ArtifactKind::MetadataXml, Category::Metadata),
];

const HARMONIZED_CLIP: &[TransferStep] = &[
    step(ArtifactKind::Analytic8bHarmonizedClip, Category::Imagery),
    step(ArtifactKind::QualityMaskClip, Category::Masks),
    step(ArtifactKind::MetadataXmlClip, Category::Metadata),
    step(ArtifactKind::GenericJson, Category::Metadata),
    step(ArtifactKind::MetadataJson, Category::Metadata),
];

/// A named upload recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadProfile {
    /// Unharmonized, unclipped delivery (CSDA, 2025-03).
    CsdaUnharmonized,
    /// Harmonized and clipped vendor download.
    HarmonizedClip,
}

impl UploadProfile {
    /// Profiles in the order they are checked.
    pub const PRIORITY: [UploadProfile; 2] =
        [UploadProfile::CsdaUnharmonized, UploadProfile::HarmonizedClip];

    pub fn name(&self) -> &'static str {
        match self {
            UploadProfile::CsdaUnharmonized => "csda_unharmonized",
            UploadProfile::HarmonizedClip => "harmonized_clip",
        }
    }

    /// Transfers in the order they are issued.
    pub fn steps(&self) -> &'static [TransferStep] {
        match self {
            UploadProfile::CsdaUnharmonized => CSDA_UNHARMONIZED,
            UploadProfile::HarmonizedClip => HARMONIZED_CLIP,
        }
    }

    /// Kinds that must all be present.
    pub fn required(&self) -> impl Iterator<Item = ArtifactKind> {
        self.steps().iter().map(|s| s.kind)
    }

    pub fn is_satisfied_by(&self, presence: &Presence) -> bool {
        presence.contains_all(self.required())
    }
}

impl fmt::Display for UploadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First profile, in [`UploadProfile::PRIORITY`] order, whose required kinds
/// are all present on `granule`.
pub fn match_profile(granule: &Granule) -> Option<UploadProfile> {
    match_presence(&granule.presence())
}

pub fn match_presence(presence: &Presence) -> Option<UploadProfile> {
    UploadProfile::PRIORITY
        .into_iter()
        .find(|profile| profile.is_satisfied_by(presence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use granule_classifier::GranuleId;
    use std::path::PathBuf;

    fn granule_with(kinds: &[ArtifactKind]) -> Granule {
        kinds.iter().fold(Granule::new(GranuleId::from("g_1_2_3")), |g, k| {
            g.with_artifact(*k, PathBuf::from(format!("/d/g_1_2_3{}", k.suffix())))
        })
    }

    fn kinds_of(profile: UploadProfile) -> Vec<ArtifactKind> {
        profile.required().collect()
    }

    #[test]
    fn test_harmonized_clip_match() {
        let g = granule_with(&kinds_of(UploadProfile::HarmonizedClip));
        assert_eq!(match_profile(&g), Some(UploadProfile::HarmonizedClip));
    }

    #[test]
    fn test_csda_match() {
        let g = granule_with(&kinds_of(UploadProfile::CsdaUnharmonized));
        assert_eq!(match_profile(&g), Some(UploadProfile::CsdaUnharmonized));
    }

    #[test]
    fn test_higher_priority_wins_when_both_satisfied() {
        let g = granule_with(&ArtifactKind::ALL);
        assert_eq!(match_profile(&g), Some(UploadProfile::CsdaUnharmonized));
    }

    #[test]
    fn test_partial_sets_do_not_match() {
        let mut kinds = kinds_of(UploadProfile::HarmonizedClip);
        kinds.retain(|k| *k != ArtifactKind::GenericJson);
        // Most of the CSDA set too, still missing its XML.
        kinds.extend([ArtifactKind::Analytic8b, ArtifactKind::QualityMask]);
        let g = granule_with(&kinds);
        assert_eq!(match_profile(&g), None);
    }

    #[test]
    fn test_mask_only_is_incomplete() {
        let g = granule_with(&[ArtifactKind::QualityMaskClip]);
        assert_eq!(match_profile(&g), None);
        assert_eq!(match_profile(&granule_with(&[])), None);
    }

    #[test]
    fn test_step_order_is_declared_order() {
        let kinds = kinds_of(UploadProfile::HarmonizedClip);
        assert_eq!(
            kinds,
            vec![
                ArtifactKind::Analytic8bHarmonizedClip,
                ArtifactKind::QualityMaskClip,
                ArtifactKind::MetadataXmlClip,
                ArtifactKind::GenericJson,
                ArtifactKind::MetadataJson,
            ]
        );
        let categories: Vec<&str> = UploadProfile::CsdaUnharmonized
            .steps()
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(categories, vec!["8b-unharmonized", "masks", "metadata", "metadata"]);
    }
}
