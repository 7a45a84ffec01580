//! Artifact kinds and their filename suffix rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category of file belonging to a granule.
///
/// The set is closed: adding a new vendor naming vintage means adding a
/// variant here, which forces every exhaustive match (suffix, column,
/// profiles) to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Unharmonized, unclipped 8-band surface reflectance image.
    #[serde(rename = "analytic_8b")]
    Analytic8b,
    /// Unharmonized 8-band image clipped to the area of interest.
    #[serde(rename = "analytic_8b_clip")]
    Analytic8bClip,
    /// Harmonized, unclipped 8-band image.
    #[serde(rename = "analytic_8b_harmonized")]
    Analytic8bHarmonized,
    /// Harmonized 8-band image clipped to the area of interest.
    #[serde(rename = "analytic_8b_harmonized_clip")]
    Analytic8bHarmonizedClip,
    /// Usable data mask (udm2).
    #[serde(rename = "quality_mask")]
    QualityMask,
    /// Usable data mask clipped to the area of interest.
    #[serde(rename = "quality_mask_clip")]
    QualityMaskClip,
    /// `<granule>_metadata.json`
    #[serde(rename = "metadata_json")]
    MetadataJson,
    /// Vendor XML metadata for the unclipped product.
    #[serde(rename = "metadata_xml")]
    MetadataXml,
    /// Vendor XML metadata for the clipped product.
    #[serde(rename = "metadata_xml_clip")]
    MetadataXmlClip,
    /// `<granule>.json` item description.
    #[serde(rename = "generic_json")]
    GenericJson,
}

impl ArtifactKind {
    /// All kinds in report column order.
    pub const ALL: [ArtifactKind; 10] = [
        ArtifactKind::Analytic8b,
        ArtifactKind::Analytic8bClip,
        ArtifactKind::Analytic8bHarmonized,
        ArtifactKind::Analytic8bHarmonizedClip,
        ArtifactKind::QualityMask,
        ArtifactKind::QualityMaskClip,
        ArtifactKind::MetadataJson,
        ArtifactKind::MetadataXml,
        ArtifactKind::MetadataXmlClip,
        ArtifactKind::GenericJson,
    ];

    /// All kinds in the order their patterns are tried.
    ///
    /// Longer suffixes come before any shorter suffix they end with, so
    /// `_metadata.json` is tested before the bare `.json` rule.
    pub const PRIORITY: [ArtifactKind; 10] = [
        ArtifactKind::Analytic8bHarmonizedClip,
        ArtifactKind::Analytic8bHarmonized,
        ArtifactKind::Analytic8bClip,
        ArtifactKind::Analytic8b,
        ArtifactKind::QualityMaskClip,
        ArtifactKind::QualityMask,
        ArtifactKind::MetadataXmlClip,
        ArtifactKind::MetadataXml,
        ArtifactKind::MetadataJson,
        ArtifactKind::GenericJson,
    ];

    /// Fixed filename suffix following the granule id.
    pub fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::Analytic8b => "_3B_AnalyticMS_SR_8b.tif",
            ArtifactKind::Analytic8bClip => "_3B_AnalyticMS_SR_8b_clip.tif",
            ArtifactKind::Analytic8bHarmonized => "_3B_AnalyticMS_SR_8b_harmonized.tif",
            ArtifactKind::Analytic8bHarmonizedClip => "_3B_AnalyticMS_SR_8b_harmonized_clip.tif",
            ArtifactKind::QualityMask => "_3B_udm2.tif",
            ArtifactKind::QualityMaskClip => "_3B_udm2_clip.tif",
            ArtifactKind::MetadataJson => "_metadata.json",
            ArtifactKind::MetadataXml => "_3B_AnalyticMS_8b_metadata.xml",
            ArtifactKind::MetadataXmlClip => "_3B_AnalyticMS_8b_metadata_clip.xml",
            ArtifactKind::GenericJson => ".json",
        }
    }

    /// Column header used in the granule report.
    pub fn column(&self) -> &'static str {
        match self {
            ArtifactKind::Analytic8b => "8b",
            ArtifactKind::Analytic8bClip => "8b_clip",
            ArtifactKind::Analytic8bHarmonized => "8b_harm",
            ArtifactKind::Analytic8bHarmonizedClip => "8b_clip_harm",
            ArtifactKind::QualityMask => "udm2",
            ArtifactKind::QualityMaskClip => "udm2_clip",
            ArtifactKind::MetadataJson => "meta.json",
            ArtifactKind::MetadataXml => "xml",
            ArtifactKind::MetadataXmlClip => "xml_clip",
            ArtifactKind::GenericJson => "json",
        }
    }

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Analytic8b => "analytic_8b",
            ArtifactKind::Analytic8bClip => "analytic_8b_clip",
            ArtifactKind::Analytic8bHarmonized => "analytic_8b_harmonized",
            ArtifactKind::Analytic8bHarmonizedClip => "analytic_8b_harmonized_clip",
            ArtifactKind::QualityMask => "quality_mask",
            ArtifactKind::QualityMaskClip => "quality_mask_clip",
            ArtifactKind::MetadataJson => "metadata_json",
            ArtifactKind::MetadataXml => "metadata_xml",
            ArtifactKind::MetadataXmlClip => "metadata_xml_clip",
            ArtifactKind::GenericJson => "generic_json",
        }
    }

    /// Position of this kind in [`ArtifactKind::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Anchored pattern capturing the granule id as `granule`.
    pub(crate) fn pattern(&self) -> String {
        format!("^(?P<granule>.+){}$", regex_lite::escape(self.suffix()))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
