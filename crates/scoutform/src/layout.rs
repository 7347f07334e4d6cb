//! Form layout profiles.
//!
//! A [`FormLayout`] is the full, fixed contract of one printed form revision:
//! canonical frame, detector tuning, expected grid topology, fill threshold
//! and the field table. Layout JSON carries a schema tag
//! (`scoutform.layout.v1`) and is validated on load.

use std::path::Path;

use crate::decode::FieldMap;
use crate::detector::DetectionConfig;
use crate::error::{Error, Result};
use crate::fill::MultiMarkPolicy;
use crate::normalize::NormalizeConfig;

const LAYOUT_SCHEMA_V1: &str = "scoutform.layout.v1";

/// Row lengths of the original 219-bubble form.
const CONTOUR_V1_ROWS: [usize; 25] = [
    10, 10, 10, 10, 10, 10, 10, 3, 1, 13, 13, 13, 17, 17, 17, 17, 16, 3, 1, 1, 3, 10, 2, 1, 1,
];
/// Row lengths of the revised 220-bubble form.
const BLOB_V2_ROWS: [usize; 25] = [
    10, 10, 10, 10, 10, 10, 10, 3, 1, 13, 13, 13, 17, 17, 17, 17, 17, 3, 1, 1, 3, 10, 2, 1, 1,
];

/// Built-in form revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutProfile {
    ContourV1,
    BlobV2,
}

impl LayoutProfile {
    pub fn layout(self) -> FormLayout {
        match self {
            Self::ContourV1 => FormLayout::contour_v1(),
            Self::BlobV2 => FormLayout::blob_v2(),
        }
    }
}

/// Complete description of one form revision.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FormLayout {
    pub name: String,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Exact number of bubbles a valid form yields.
    pub expected_bubbles: usize,
    /// Exact bubble count of each row, top to bottom.
    pub expected_rows: Vec<usize>,
    /// Vertical center jump (px) that starts a new row.
    pub row_gap_px: f32,
    /// Ink fraction above which a bubble counts as marked.
    pub fill_threshold: f32,
    #[serde(default)]
    pub multi_mark: MultiMarkPolicy,
    pub fields: FieldMap,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct LayoutFileV1 {
    schema: String,
    #[serde(flatten)]
    layout: FormLayout,
}

impl FormLayout {
    /// Original form: contour detection, 219 bubbles, 50% fill, shoot
    /// location mandatory.
    pub fn contour_v1() -> Self {
        Self {
            name: "contour_v1".to_string(),
            normalize: NormalizeConfig::default(),
            detection: DetectionConfig::default(),
            expected_bubbles: 219,
            expected_rows: CONTOUR_V1_ROWS.to_vec(),
            row_gap_px: 30.0,
            fill_threshold: 0.5,
            multi_mark: MultiMarkPolicy::Rightmost,
            fields: FieldMap::contour_v1(),
        }
    }

    /// Revised form: blob detection, 220 bubbles, 70% fill, shoot location
    /// optional, teleop scales continuing onto a second row.
    pub fn blob_v2() -> Self {
        Self {
            name: "blob_v2".to_string(),
            normalize: NormalizeConfig::default(),
            detection: DetectionConfig::blob(),
            expected_bubbles: 220,
            expected_rows: BLOB_V2_ROWS.to_vec(),
            row_gap_px: 30.0,
            fill_threshold: 0.7,
            multi_mark: MultiMarkPolicy::Rightmost,
            fields: FieldMap::blob_v2(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.expected_rows.len()
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        validate_layout(self).map_err(Error::Layout)
    }

    /// Load and validate a layout JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let file: LayoutFileV1 =
            serde_json::from_str(data).map_err(|e| Error::Layout(e.to_string()))?;
        if file.schema != LAYOUT_SCHEMA_V1 {
            return Err(Error::Layout(format!(
                "unsupported layout schema '{}' (expected '{}')",
                file.schema, LAYOUT_SCHEMA_V1
            )));
        }
        file.layout.validate()?;
        Ok(file.layout)
    }

    /// Serialize with the schema tag, ready for [`FormLayout::from_json_str`].
    pub fn to_json_string(&self) -> Result<String> {
        let file = LayoutFileV1 {
            schema: LAYOUT_SCHEMA_V1.to_string(),
            layout: self.clone(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| Error::Layout(e.to_string()))
    }
}

impl Default for FormLayout {
    fn default() -> Self {
        Self::contour_v1()
    }
}

fn validate_layout(layout: &FormLayout) -> std::result::Result<(), String> {
    if layout.name.trim().is_empty() {
        return Err("layout name must not be empty".to_string());
    }

    let norm = &layout.normalize;
    if norm.target_height == 0 {
        return Err("normalize.target_height must be >= 1".to_string());
    }
    if let Some(crop) = norm.crop {
        let valid = |f: f32| f.is_finite() && (0.0..1.0).contains(&f);
        if !valid(crop.left_frac) || !valid(crop.top_frac) {
            return Err("crop fractions must be in [0, 1)".to_string());
        }
    }

    layout.detection.validate()?;

    if layout.expected_rows.is_empty() {
        return Err("expected_rows must not be empty".to_string());
    }
    if layout.expected_rows.contains(&0) {
        return Err("expected_rows entries must be >= 1".to_string());
    }
    let total: usize = layout.expected_rows.iter().sum();
    if total != layout.expected_bubbles {
        return Err(format!(
            "expected_rows sum to {total} but expected_bubbles is {}",
            layout.expected_bubbles
        ));
    }

    if !layout.row_gap_px.is_finite() || layout.row_gap_px <= 0.0 {
        return Err("row_gap_px must be finite and > 0".to_string());
    }
    if !(layout.fill_threshold > 0.0 && layout.fill_threshold < 1.0) {
        return Err("fill_threshold must be in (0, 1)".to_string());
    }

    layout.fields.validate(layout.n_rows())?;

    let fields = &layout.fields;
    if let Some(&r) = fields
        .team_rows
        .iter()
        .chain(&fields.match_rows)
        .find(|&&r| layout.expected_rows[r] > 10)
    {
        return Err(format!(
            "digit row {r} has {} bubbles (at most 10)",
            layout.expected_rows[r]
        ));
    }
    Ok(())
}
