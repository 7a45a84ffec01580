//! Image object names: `<date>_<time>_<satellite>_<pass>_3B_<product>.tif`.

use chrono::NaiveDateTime;

/// Separator between the granule id and the product part of a name.
pub const PRODUCT_SEPARATOR: &str = "_3B_";

const ACQUISITION_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssetNameError {
    #[error("'{0}' has no file name")]
    Empty(String),

    #[error("'{0}' is not <date>_<time>_<satellite>_<pass>")]
    Layout(String),

    #[error("'{name}' has no valid acquisition time: {reason}")]
    Timestamp { name: String, reason: String },
}

/// Fields parsed from one image object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName {
    /// File stem, used as the catalog asset id.
    pub asset_id: String,
    /// Name up to the first `_3B_`.
    pub granule: String,
    pub acquired: NaiveDateTime,
    pub satellite: String,
    pub pass_id: String,
}

impl AssetName {
    /// Parse an object URL or bare file name.
    pub fn parse(object: &str) -> Result<Self, AssetNameError> {
        let file_name = object.rsplit('/').next().unwrap_or(object);
        if file_name.is_empty() {
            return Err(AssetNameError::Empty(object.to_string()));
        }
        let asset_id = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file_name,
        };
        let granule = asset_id
            .split_once(PRODUCT_SEPARATOR)
            .map_or(asset_id, |(head, _)| head);

        let segments: Vec<&str> = granule.splitn(4, '_').collect();
        let [date, time, satellite, pass_id] = segments.as_slice() else {
            return Err(AssetNameError::Layout(granule.to_string()));
        };
        if satellite.is_empty() || pass_id.is_empty() {
            return Err(AssetNameError::Layout(granule.to_string()));
        }
        let acquired = NaiveDateTime::parse_from_str(&format!("{date}_{time}"), ACQUISITION_FORMAT)
            .map_err(|e| AssetNameError::Timestamp {
                name: granule.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            asset_id: asset_id.to_string(),
            granule: granule.to_string(),
            acquired,
            satellite: satellite.to_string(),
            pass_id: pass_id.to_string(),
        })
    }

    /// File name of the XML sidecar expected for this image.
    pub fn xml_sidecar(&self) -> String {
        format!("{}{PRODUCT_SEPARATOR}AnalyticMS_8b_metadata_clip.xml", self.granule)
    }

    /// File name of the optional JSON sidecar.
    pub fn json_sidecar(&self) -> String {
        format!("{}_metadata.json", self.granule)
    }
}
