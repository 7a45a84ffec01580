//! CSV reports written to stdout.
//!
//! Granule table: `granule`, one 0/1 column per artifact kind, `others`
//! (file names joined with `|`), `uploaded` (0/1).
//! Catalog table: `asset_id,granule,status`.

use std::io::Write;

use granule_classifier::ArtifactKind;

use crate::catalog::AssetResult;
use crate::granule::Granule;

/// Separator between `others` file names.
pub const OTHERS_SEPARATOR: &str = "|";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Header row of the granule table.
pub fn granule_header() -> Vec<&'static str> {
    let mut header = vec!["granule"];
    header.extend(ArtifactKind::ALL.iter().map(ArtifactKind::column));
    header.extend(["others", "uploaded"]);
    header
}

/// One granule table row.
pub fn granule_row(granule: &Granule) -> Vec<String> {
    let presence = granule.presence();
    let mut row = Vec::with_capacity(ArtifactKind::ALL.len() + 3);
    row.push(granule.id().to_string());
    row.extend(
        ArtifactKind::ALL
            .iter()
            .map(|kind| u8::from(presence.has(*kind)).to_string()),
    );
    row.push(granule.others().join(OTHERS_SEPARATOR));
    row.push(granule.status().uploaded_flag().to_string());
    row
}

/// Write the granule table.
pub fn write_granules<'a, W, I>(out: W, granules: I) -> Result<(), ReportError>
where
    W: Write,
    I: IntoIterator<Item = &'a Granule>,
{
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(granule_header())?;
    for granule in granules {
        writer.write_record(granule_row(granule))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the catalog table.
pub fn write_assets<W: Write>(out: W, results: &[AssetResult]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["asset_id", "granule", "status"])?;
    for result in results {
        writer.write_record([
            result.asset_id.as_str(),
            result.granule.as_str(),
            result.status.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
