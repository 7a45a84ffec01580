//! Vendor XML metadata lookups.
//!
//! Each [`Lookup`] is evaluated against the whole document. Paths are
//! descendant searches (`.//prefix:tag`) and the first matching element in
//! document order wins.

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use crate::{MetadataError, PropertyMap, MISSING_VALUE};

/// Namespace prefixes used by the lookup table.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("eop", "http://earth.esa.int/eop"),
    (
        "ps",
        "http://schemas.planet.com/ps/v1/planet_product_metadata_geocorrected_level",
    ),
    ("opt", "http://earth.esa.int/opt"),
];

/// One element lookup. Names are `prefix:tag` qualified names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// First `tag` anywhere; key is the tag's local name.
    Single(&'static str),

    /// First `child` under the first `parent`; key is `parent_child`.
    Nested {
        parent: &'static str,
        child: &'static str,
    },

    /// For every `parent`, the first `tag` keyed by the sibling `index`
    /// value: `tag_index_<value>`. One record per spectral band.
    PerBand {
        parent: &'static str,
        index: &'static str,
        tag: &'static str,
    },
}

/// Lookups applied to `*_3B_AnalyticMS_8b_metadata*.xml` sidecars.
pub const PLANET_LOOKUPS: &[Lookup] = &[
    Lookup::Single("eop:acquisitionType"),
    Lookup::Single("eop:processorVersion"),
    Lookup::Single("ps:versionIsd"),
    Lookup::Nested {
        parent: "eop:Platform",
        child: "eop:serialIdentifier",
    },
    Lookup::Nested {
        parent: "eop:Platform",
        child: "eop:orbitType",
    },
    Lookup::Nested {
        parent: "eop:Instrument",
        child: "eop:shortName",
    },
    Lookup::Single("eop:orbitDirection"),
    Lookup::Single("eop:incidenceAngle"),
    Lookup::Single("opt:illuminationAzimuthAngle"),
    Lookup::Single("opt:illuminationElevationAngle"),
    Lookup::Single("ps:azimuthAngle"),
    Lookup::Single("ps:spaceCraftViewAngle"),
    Lookup::Single("ps:acquisitionDateTime"),
    Lookup::Single("ps:radiometricCorrectionApplied"),
    Lookup::Single("ps:geoCorrectionLevel"),
    Lookup::Single("ps:elevationCorrectionApplied"),
    Lookup::Single("ps:atmosphericCorrectionApplied"),
    Lookup::Single("opt:cloudCoverPercentage"),
    Lookup::Single("ps:unusableDataPercentage"),
    Lookup::PerBand {
        parent: "ps:bandSpecificMetadata",
        index: "ps:bandNumber",
        tag: "ps:reflectanceCoefficient",
    },
    Lookup::Single("ps:radiometricScaleFactor"),
];

/// A resolved `prefix:tag` name.
#[derive(Debug, Clone, Copy)]
struct QName<'a> {
    uri: &'a str,
    local: &'a str,
}

impl<'a> QName<'a> {
    fn resolve(qualified: &'a str, namespaces: &[(&'a str, &'a str)]) -> Result<Self, MetadataError> {
        let (prefix, local) = qualified
            .split_once(':')
            .ok_or_else(|| MetadataError::UnknownPrefix(qualified.to_string()))?;
        let uri = namespaces
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, uri)| *uri)
            .ok_or_else(|| MetadataError::UnknownPrefix(prefix.to_string()))?;
        Ok(Self { uri, local })
    }

    fn matches(&self, node: &Node<'_, '_>) -> bool {
        node.is_element()
            && node.tag_name().name() == self.local
            && node.tag_name().namespace() == Some(self.uri)
    }
}

/// Descendants of `node` (excluding itself) named `name`, in document order.
fn find_all<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: QName<'a>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants().skip(1).filter(move |n| name.matches(n))
}

fn find_first<'a, 'input: 'a>(node: Node<'a, 'input>, name: QName<'a>) -> Option<Node<'a, 'input>> {
    find_all(node, name).next()
}

/// Trimmed element text, or `None` when the element is empty.
fn text_of(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Apply `lookups` to an XML document string.
pub fn extract_xml(xml: &str, lookups: &[Lookup]) -> Result<PropertyMap, MetadataError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    let mut props = PropertyMap::new();

    for lookup in lookups {
        match *lookup {
            Lookup::Single(tag) => {
                let name = QName::resolve(tag, NAMESPACES)?;
                let value = find_first(root, name).and_then(text_of);
                if value.is_none() {
                    debug!(tag, "lookup matched nothing");
                }
                props.insert(name.local, value.as_deref().unwrap_or(MISSING_VALUE));
            }
            Lookup::Nested { parent, child } => {
                let parent_name = QName::resolve(parent, NAMESPACES)?;
                let child_name = QName::resolve(child, NAMESPACES)?;
                let value = find_first(root, parent_name)
                    .and_then(|p| find_first(p, child_name))
                    .and_then(text_of);
                if value.is_none() {
                    debug!(parent, child, "nested lookup matched nothing");
                }
                let key = format!("{}_{}", parent_name.local, child_name.local);
                props.insert(key, value.as_deref().unwrap_or(MISSING_VALUE));
            }
            Lookup::PerBand { parent, index, tag } => {
                let parent_name = QName::resolve(parent, NAMESPACES)?;
                let index_name = QName::resolve(index, NAMESPACES)?;
                let tag_name = QName::resolve(tag, NAMESPACES)?;
                for record in find_all(root, parent_name) {
                    let Some(band) = find_first(record, index_name).and_then(text_of) else {
                        warn!(parent, index, "band record without index; skipped");
                        continue;
                    };
                    let value = find_first(record, tag_name).and_then(text_of);
                    let key = format!("{}_{}_{}", tag_name.local, index_name.local, band);
                    props.insert(key, value.as_deref().unwrap_or(MISSING_VALUE));
                }
            }
        }
    }

    Ok(props)
}
