//! Edge/contour bubble detection.
//!
//! Printed bubble outlines fragment under Canny (pen strokes, glare, JPEG
//! noise). Every edge contour whose enclosing circle has a bubble-sized
//! radius is painted as a solid disk onto a copy of the image; binarizing that
//! copy turns each bubble, outlined or marked, into one solid blob whose outer
//! contour recovers the true bubble outline.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

use super::config::{ContourParams, RadiusBand};
use super::geometry::{all_contours, min_enclosing_circle, outer_contours, radius_out_of_reach};
use super::{BubbleDetection, BubbleDetector};
use crate::threshold::ink_mask;

#[derive(Debug, Clone)]
pub struct ContourDetector {
    radius: RadiusBand,
    params: ContourParams,
}

impl ContourDetector {
    pub fn new(radius: RadiusBand, params: ContourParams) -> Self {
        Self { radius, params }
    }

    /// Gray copy with every bubble-sized edge loop painted solid black.
    pub(crate) fn fill_candidates(&self, gray: &GrayImage) -> GrayImage {
        let edges = imageproc::edges::canny(gray, self.params.canny_low, self.params.canny_high);
        let mut filled = gray.clone();
        let (r_min, r_max) = (self.radius.min_px as f64, self.radius.max_px as f64);
        let mut painted = 0usize;
        for points in all_contours(&edges) {
            if radius_out_of_reach(&points, r_min, r_max) {
                continue;
            }
            let Some(c) = min_enclosing_circle(&points) else {
                continue;
            };
            if self.radius.contains(c.r as f32) {
                draw_filled_circle_mut(
                    &mut filled,
                    (c.cx as i32, c.cy as i32),
                    c.r as i32,
                    Luma([0u8]),
                );
                painted += 1;
            }
        }
        tracing::trace!("Painted {} candidate disks", painted);
        filled
    }

    fn inside_margin(&self, x: f64, y: f64, width: u32, height: u32) -> bool {
        let m = self.params.edge_margin_frac as f64;
        let (w, h) = (width as f64, height as f64);
        x > w * m && x < w * (1.0 - m) && y > h * m && y < h * (1.0 - m)
    }
}

impl BubbleDetector for ContourDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<BubbleDetection> {
        let filled = self.fill_candidates(gray);
        let mask = ink_mask(&filled);
        let (r_min, r_max) = (self.radius.min_px as f64, self.radius.max_px as f64);

        let mut out = Vec::new();
        for points in outer_contours(&mask) {
            if radius_out_of_reach(&points, r_min, r_max) {
                continue;
            }
            let Some(c) = min_enclosing_circle(&points) else {
                continue;
            };
            if self.radius.contains(c.r as f32)
                && self.inside_margin(c.cx, c.cy, gray.width(), gray.height())
            {
                out.push(BubbleDetection::new(c.cx as f32, c.cy as f32, c.r as f32));
            }
        }
        out
    }
}
