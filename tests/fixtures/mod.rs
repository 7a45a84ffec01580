//! Shared fixtures: data directories and sidecar documents.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const HARMONIZED: &str = "20201020_162847_94_2416";
pub const CSDA: &str = "20250301_101500_12_24a3";

/// Files of a complete harmonized, clipped granule.
pub fn harmonized_files(granule: &str) -> Vec<String> {
    [
        "_3B_AnalyticMS_SR_8b_harmonized_clip.tif",
        "_3B_udm2_clip.tif",
        ".json",
        "_metadata.json",
        "_3B_AnalyticMS_8b_metadata_clip.xml",
    ]
    .iter()
    .map(|suffix| format!("{granule}{suffix}"))
    .collect()
}

/// Files of a complete unharmonized, unclipped granule.
pub fn csda_files(granule: &str) -> Vec<String> {
    [
        "_3B_AnalyticMS_SR_8b.tif",
        "_3B_udm2.tif",
        "_metadata.json",
        "_3B_AnalyticMS_8b_metadata.xml",
    ]
    .iter()
    .map(|suffix| format!("{granule}{suffix}"))
    .collect()
}

/// Create empty files named `names` under `dir/sub`.
pub fn write_files<S: AsRef<str>>(dir: &Path, sub: &str, names: &[S]) -> Vec<PathBuf> {
    let parent = dir.join(sub);
    fs::create_dir_all(&parent).unwrap();
    names
        .iter()
        .map(|name| {
            let path = parent.join(name.as_ref());
            fs::write(&path, b"").unwrap();
            path
        })
        .collect()
}

/// A cut-down vendor XML sidecar with two band records.
pub fn planet_xml(serial: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ps:EarthObservation xmlns:eop="http://earth.esa.int/eop"
    xmlns:opt="http://earth.esa.int/opt"
    xmlns:ps="http://schemas.planet.com/ps/v1/planet_product_metadata_geocorrected_level">
  <eop:acquisitionType>NOMINAL</eop:acquisitionType>
  <eop:Platform>
    <eop:shortName>PlanetScope</eop:shortName>
    <eop:serialIdentifier>{serial}</eop:serialIdentifier>
    <eop:orbitType>LEO</eop:orbitType>
  </eop:Platform>
  <ps:geoCorrectionLevel>Precision Geocorrection</ps:geoCorrectionLevel>
  <opt:cloudCoverPercentage>12</opt:cloudCoverPercentage>
  <ps:bandSpecificMetadata>
    <ps:bandNumber>1</ps:bandNumber>
    <ps:reflectanceCoefficient>2.1e-05</ps:reflectanceCoefficient>
  </ps:bandSpecificMetadata>
  <ps:bandSpecificMetadata>
    <ps:bandNumber>2</ps:bandNumber>
    <ps:reflectanceCoefficient>2.3e-05</ps:reflectanceCoefficient>
  </ps:bandSpecificMetadata>
</ps:EarthObservation>
"#
    )
}

/// A JSON sidecar whose `properties` override `cloudCoverPercentage`.
pub fn planet_json() -> &'static str {
    r#"{
  "id": "20201020_162847_94_2416",
  "type": "Feature",
  "properties": {
    "cloudCoverPercentage": 0.5,
    "instrument": "PSB.SD",
    "ground_control": true
  }
}"#
}
