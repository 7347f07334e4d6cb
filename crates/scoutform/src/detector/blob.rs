//! Blob-based bubble detection.
//!
//! The canonical image is binarized once; every outer ink contour is a blob
//! candidate. Blobs are kept when their enclosed area and inertia ratio match
//! a bubble and their equivalent radius lies in the radius band.

use image::GrayImage;

use super::config::{BlobParams, RadiusBand};
use super::geometry::{outer_contours, polygon_moments};
use super::{BubbleDetection, BubbleDetector};
use crate::threshold::ink_mask;

#[derive(Debug, Clone)]
pub struct BlobDetector {
    radius: RadiusBand,
    params: BlobParams,
}

impl BlobDetector {
    pub fn new(radius: RadiusBand, params: BlobParams) -> Self {
        Self { radius, params }
    }
}

impl BubbleDetector for BlobDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<BubbleDetection> {
        let mask = ink_mask(gray);
        let p = &self.params;

        outer_contours(&mask)
            .iter()
            .filter_map(|points| polygon_moments(points))
            .filter(|m| {
                m.area >= p.min_area_px as f64
                    && m.area <= p.max_area_px as f64
                    && m.inertia_ratio >= p.min_inertia_ratio as f64
            })
            .filter_map(|m| {
                let r = (m.area / std::f64::consts::PI).sqrt() as f32;
                self.radius
                    .contains(r)
                    .then(|| BubbleDetection::new(m.cx as f32, m.cy as f32, r))
            })
            .collect()
    }
}
