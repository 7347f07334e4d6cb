use image::{GrayImage, RgbImage};

use crate::fill::RowSelection;
use crate::record::ScoutingRecord;

/// Debug artifacts captured when the reader runs with `visualize` on.
#[derive(Debug, Clone)]
pub struct DebugImages {
    /// The canonical grayscale frame the detector saw.
    pub canonical: GrayImage,
    /// Canonical frame with detected bubbles outlined and selections marked.
    pub overlay: RgbImage,
}

/// Full result of reading one form.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FormReport {
    /// The decoded record.
    pub record: ScoutingRecord,
    /// Canonical image dimensions [width, height].
    pub image_size: [u32; 2],
    /// Number of bubbles detected (equals the layout's expected count).
    pub bubble_count: usize,
    /// Per-row selected column (1-based), top to bottom.
    pub selections: Vec<RowSelection>,
    #[serde(skip)]
    pub debug: Option<DebugImages>,
}
