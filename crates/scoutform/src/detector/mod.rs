//! Bubble detection: unordered `(x, y, radius)` marks in the canonical image.
//!
//! Two strategies share the [`BubbleDetector`] interface. The layout's
//! [`DetectionConfig`] chooses one; [`detect_bubbles`] runs it and enforces
//! the exact-count post-condition.

mod blob;
mod config;
mod contour;
pub(crate) mod geometry;

use image::GrayImage;

use crate::error::{Error, Result};
use crate::layout::FormLayout;

pub use blob::BlobDetector;
pub use config::{BlobParams, ContourParams, DetectionConfig, DetectionStrategy, RadiusBand};
pub use contour::ContourDetector;

/// One candidate bubble in canonical pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BubbleDetection {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl BubbleDetection {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }
}

/// A strategy that finds candidate bubbles in a canonical grayscale image.
pub trait BubbleDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<BubbleDetection>;
}

/// Build the detector selected by `config.strategy`.
pub fn detector_for(config: &DetectionConfig) -> Box<dyn BubbleDetector> {
    match config.strategy {
        DetectionStrategy::Contour => {
            Box::new(ContourDetector::new(config.radius, config.contour.clone()))
        }
        DetectionStrategy::Blob => Box::new(BlobDetector::new(config.radius, config.blob.clone())),
    }
}

/// Run the layout's detector and check the bubble count.
pub fn detect_bubbles(gray: &GrayImage, layout: &FormLayout) -> Result<Vec<BubbleDetection>> {
    let detector = detector_for(&layout.detection);
    let bubbles = detector.detect(gray);
    tracing::debug!(
        "{:?} detector found {} bubbles (expected {})",
        layout.detection.strategy,
        bubbles.len(),
        layout.expected_bubbles
    );
    if bubbles.len() != layout.expected_bubbles {
        return Err(Error::BubbleCountMismatch {
            expected: layout.expected_bubbles,
            found: bubbles.len(),
        });
    }
    Ok(bubbles)
}
