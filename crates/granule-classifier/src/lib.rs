//! Filename classifier for vendor imagery granules.
//!
//! Maps a single filename to the artifact kind it represents and the granule
//! id it belongs to. The classifier is pure: it never touches the
//! filesystem and never fails.

mod kind;
mod result;

pub use kind::ArtifactKind;
pub use result::{Classification, GranuleId};

use regex_lite::Regex;
use std::sync::OnceLock;

/// Number of leading underscore segments used to attribute an
/// unrecognized file to a granule.
pub const FALLBACK_SEGMENTS: usize = 4;

/// Compiled recognition rules, one per artifact kind, in priority order.
pub struct Classifier {
    rules: Vec<(ArtifactKind, Regex)>,
}

impl Classifier {
    /// Compile the rules for every kind in [`ArtifactKind::PRIORITY`] order.
    pub fn new() -> Self {
        let rules = ArtifactKind::PRIORITY
            .iter()
            .map(|kind| {
                // Escaped literal suffix behind a fixed prefix; always valid.
                let re = Regex::new(&kind.pattern()).unwrap_or_else(|e| {
                    panic!("invalid pattern for {kind}: {e}");
                });
                (*kind, re)
            })
            .collect();
        Self { rules }
    }

    /// Classify a bare filename (no directory components).
    pub fn classify(&self, filename: &str) -> Classification {
        for (kind, re) in &self.rules {
            if let Some(caps) = re.captures(filename) {
                if let Some(granule) = caps.name("granule") {
                    return Classification::Artifact {
                        kind: *kind,
                        granule: GranuleId::new(granule.as_str()),
                    };
                }
            }
        }

        let parts: Vec<&str> = filename.split('_').collect();
        if parts.len() >= FALLBACK_SEGMENTS {
            Classification::Unrecognized {
                granule: GranuleId::new(parts[..FALLBACK_SEGMENTS].join("_")),
            }
        } else {
            Classification::Dropped
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a filename using a shared, lazily compiled [`Classifier`].
pub fn classify(filename: &str) -> Classification {
    static CLASSIFIER: OnceLock<Classifier> = OnceLock::new();
    CLASSIFIER.get_or_init(Classifier::new).classify(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRANULE: &str = "20201020_162847_94_2416";

    fn artifact(kind: ArtifactKind, granule: &str) -> Classification {
        Classification::Artifact {
            kind,
            granule: GranuleId::from(granule),
        }
    }

    #[test]
    fn test_every_kind_strips_its_suffix() {
        for kind in ArtifactKind::ALL {
            let name = format!("{GRANULE}{}", kind.suffix());
            assert_eq!(classify(&name), artifact(kind, GRANULE), "{name}");
        }
    }

    #[test]
    fn test_harmonized_clip_not_plain_8b() {
        let result = classify("20201020_162847_94_2416_3B_AnalyticMS_SR_8b_harmonized_clip.tif");
        assert_eq!(result.kind(), Some(ArtifactKind::Analytic8bHarmonizedClip));
        assert_eq!(result.granule().map(GranuleId::as_str), Some(GRANULE));
    }

    #[test]
    fn test_metadata_json_before_generic_json() {
        let result = classify("20201020_162847_94_2416_metadata.json");
        assert_eq!(result, artifact(ArtifactKind::MetadataJson, GRANULE));

        let result = classify("20201020_162847_94_2416.json");
        assert_eq!(result, artifact(ArtifactKind::GenericJson, GRANULE));
    }

    #[test]
    fn test_patterns_are_end_anchored() {
        let result = classify("20201020_162847_94_2416.json.bak");
        assert_eq!(
            result,
            Classification::Unrecognized {
                granule: GranuleId::from("20201020_162847_94_2416.json.bak")
            }
        );

        let result = classify("20201020_162847_94_2416_3B_udm2.tif.aux.xml");
        assert_eq!(result.kind(), None);
    }

    #[test]
    fn test_granule_must_be_non_empty() {
        // Bare suffix with nothing in front of it.
        assert_eq!(classify(".json"), Classification::Dropped);
    }

    #[test]
    fn test_unrecognized_uses_first_four_segments() {
        let result = classify("20241030_482680_23_59v8_8b_mmetadata.json");
        // `.json` matches as a generic json whose granule keeps the typo.
        assert_eq!(result.kind(), Some(ArtifactKind::GenericJson));

        let result = classify("20241030_482680_23_59v8_udm2.tif");
        assert_eq!(
            result,
            Classification::Unrecognized {
                granule: GranuleId::from("20241030_482680_23_59v8")
            }
        );
    }

    #[test]
    fn test_short_names_dropped() {
        assert_eq!(classify("README.md"), Classification::Dropped);
        assert_eq!(classify("a_b_c.tif"), Classification::Dropped);
        assert!(matches!(classify("a_b_c_d"), Classification::Unrecognized { .. }));
    }

    #[test]
    fn test_classifier_instances_agree() {
        let classifier = Classifier::new();
        for name in [
            "20201020_162847_94_2416_3B_udm2_clip.tif",
            "20201020_162847_94_2416_3B_AnalyticMS_8b_metadata.xml",
            "notes.txt",
        ] {
            assert_eq!(classifier.classify(name), classify(name));
        }
    }
}
