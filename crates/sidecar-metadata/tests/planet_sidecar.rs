//! Extraction against full vendor sidecar documents.

use sidecar_metadata::{extract, SidecarSchema, MISSING_VALUE};
use std::io::Write;
use tempfile::NamedTempFile;

fn band(number: u32, coefficient: &str) -> String {
    format!(
        "<ps:bandSpecificMetadata>\
           <ps:bandNumber>{number}</ps:bandNumber>\
           <ps:radiometricScaleFactor>0.01</ps:radiometricScaleFactor>\
           <ps:reflectanceCoefficient>{coefficient}</ps:reflectanceCoefficient>\
         </ps:bandSpecificMetadata>"
    )
}

fn planet_xml(bands: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ps:EarthObservation xmlns:eop="http://earth.esa.int/eop"
    xmlns:gml="http://www.opengis.net/gml"
    xmlns:opt="http://earth.esa.int/opt"
    xmlns:ps="http://schemas.planet.com/ps/v1/planet_product_metadata_geocorrected_level">
  <gml:metaDataProperty>
    <ps:EarthObservationMetaData>
      <eop:identifier>20201020_162847_94_2416_3B_AnalyticMS_SR_8b_harmonized_clip</eop:identifier>
      <eop:acquisitionType>NOMINAL</eop:acquisitionType>
      <eop:productType>L3B</eop:productType>
      <eop:status>ARCHIVED</eop:status>
      <eop:processing>
        <eop:ProcessingInformation>
          <eop:processorName>PlanetScope Processor</eop:processorName>
          <eop:processorVersion>4.1.3</eop:processorVersion>
        </eop:ProcessingInformation>
      </eop:processing>
      <ps:versionIsd>1.0</ps:versionIsd>
    </ps:EarthObservationMetaData>
  </gml:metaDataProperty>
  <gml:using>
    <eop:EarthObservationEquipment>
      <eop:platform>
        <eop:Platform>
          <eop:shortName>PlanetScope</eop:shortName>
          <eop:serialIdentifier>2416</eop:serialIdentifier>
          <eop:orbitType>LEO</eop:orbitType>
        </eop:Platform>
      </eop:platform>
      <eop:instrument>
        <eop:Instrument>
          <eop:shortName>PSB.SD</eop:shortName>
        </eop:Instrument>
      </eop:instrument>
      <eop:acquisitionParameters>
        <ps:Acquisition>
          <eop:orbitDirection>DESCENDING</eop:orbitDirection>
          <eop:incidenceAngle>3.1</eop:incidenceAngle>
          <opt:illuminationAzimuthAngle>153.2</opt:illuminationAzimuthAngle>
          <opt:illuminationElevationAngle>43.7</opt:illuminationElevationAngle>
          <ps:azimuthAngle>101.5</ps:azimuthAngle>
          <ps:spaceCraftViewAngle>2.8</ps:spaceCraftViewAngle>
          <ps:acquisitionDateTime>2020-10-20T16:28:47+00:00</ps:acquisitionDateTime>
        </ps:Acquisition>
      </eop:acquisitionParameters>
    </eop:EarthObservationEquipment>
  </gml:using>
  <gml:resultOf>
    <ps:EarthObservationResult>
      <ps:product>
        <ps:ProductInformation>
          <ps:radiometricCorrectionApplied>true</ps:radiometricCorrectionApplied>
          <ps:geoCorrectionLevel>Precision Geocorrection</ps:geoCorrectionLevel>
          <ps:elevationCorrectionApplied>FineDEM</ps:elevationCorrectionApplied>
          <ps:atmosphericCorrectionApplied>true</ps:atmosphericCorrectionApplied>
        </ps:ProductInformation>
      </ps:product>
      <opt:cloudCoverPercentage>0</opt:cloudCoverPercentage>
      <ps:unusableDataPercentage>0</ps:unusableDataPercentage>
      {}
    </ps:EarthObservationResult>
  </gml:resultOf>
</ps:EarthObservation>
"#,
        bands.join("\n")
    )
}

fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_four_bands_yield_four_distinct_keys() {
    let bands: Vec<String> = [(1, "2.0e-05"), (2, "2.1e-05"), (3, "2.2e-05"), (4, "2.3e-05")]
        .iter()
        .map(|(n, c)| band(*n, c))
        .collect();
    let file = write_temp(&planet_xml(&bands), ".xml");

    let props = extract(file.path(), SidecarSchema::PlanetXml).unwrap();

    let band_keys: Vec<&str> = props
        .iter()
        .map(|(k, _)| k)
        .filter(|k| k.starts_with("reflectanceCoefficient_"))
        .collect();
    assert_eq!(
        band_keys,
        vec![
            "reflectanceCoefficient_bandNumber_1",
            "reflectanceCoefficient_bandNumber_2",
            "reflectanceCoefficient_bandNumber_3",
            "reflectanceCoefficient_bandNumber_4",
        ]
    );
    assert_eq!(props.get("reflectanceCoefficient_bandNumber_3"), Some("2.2e-05"));
}

#[test]
fn test_scalar_and_nested_lookups() {
    let file = write_temp(&planet_xml(&[band(1, "2.0e-05")]), ".xml");
    let props = extract(file.path(), SidecarSchema::PlanetXml).unwrap();

    assert_eq!(props.get("acquisitionType"), Some("NOMINAL"));
    assert_eq!(props.get("processorVersion"), Some("4.1.3"));
    assert_eq!(props.get("Platform_serialIdentifier"), Some("2416"));
    assert_eq!(props.get("Platform_orbitType"), Some("LEO"));
    // Instrument's shortName, not the Platform's that appears first.
    assert_eq!(props.get("Instrument_shortName"), Some("PSB.SD"));
    assert_eq!(props.get("geoCorrectionLevel"), Some("Precision_Geocorrection"));
    assert_eq!(props.get("radiometricScaleFactor"), Some("0.01"));
}

#[test]
fn test_sparse_document_degrades_to_sentinel() {
    let xml = r#"<ps:EarthObservation xmlns:ps="http://schemas.planet.com/ps/v1/planet_product_metadata_geocorrected_level"/>"#;
    let file = write_temp(xml, ".xml");
    let props = extract(file.path(), SidecarSchema::PlanetXml).unwrap();

    assert_eq!(props.get("acquisitionType"), Some(MISSING_VALUE));
    assert_eq!(props.get("Platform_serialIdentifier"), Some(MISSING_VALUE));
    assert!(props.iter().all(|(k, _)| !k.starts_with("reflectanceCoefficient_")));
}

#[test]
fn test_json_sidecar() {
    let json = r#"{"type": "Feature", "properties": {"item_type": "PSScene", "satellite_id": "2416"}}"#;
    let file = write_temp(json, ".json");
    let schema = SidecarSchema::from_path(file.path()).unwrap();
    let props = extract(file.path(), schema).unwrap();

    assert_eq!(props.len(), 2);
    assert_eq!(props.get("item_type"), Some("PSScene"));
}
