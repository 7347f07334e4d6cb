//! Geometric preprocessing into the canonical working frame.
//!
//! Every photo is rescaled to a fixed reference height (aspect preserved) and
//! then cropped by fixed fractional margins so that bubble radii and row gaps
//! land in the ranges the detector constants were tuned for.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageReader};

use crate::error::{Error, Result};

/// Fractional margins removed from the top-left of the resized photo.
///
/// Both fractions are multiplied by the canonical *height*, matching how the
/// printed form sits on the photographed page.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropMargins {
    pub left_frac: f32,
    pub top_frac: f32,
}

/// Canonical-frame parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Height (pixels) every photo is resized to.
    pub target_height: u32,
    /// Optional crop applied after resizing.
    pub crop: Option<CropMargins>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            target_height: 2000,
            crop: Some(CropMargins {
                left_frac: 0.16,
                top_frac: 0.09,
            }),
        }
    }
}

impl NormalizeConfig {
    /// Width the resized image gets for a `(w, h)` source, before cropping.
    pub fn scaled_width(&self, width: u32, height: u32) -> u32 {
        let ratio = width as f64 / height as f64;
        (self.target_height as f64 * ratio) as u32
    }

    /// Crop offsets `(x, y)` in canonical pixels.
    pub fn crop_offsets(&self) -> (u32, u32) {
        match self.crop {
            Some(c) => {
                let h = self.target_height as f32;
                ((h * c.left_frac) as u32, (h * c.top_frac) as u32)
            }
            None => (0, 0),
        }
    }
}

/// Decode a photo from disk.
///
/// IO and decode failures both surface as [`Error::InvalidImage`].
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| Error::InvalidImage(format!("{}: {}", path.display(), e)))?;
    let reader = reader
        .with_guessed_format()
        .map_err(|e| Error::InvalidImage(format!("{}: {}", path.display(), e)))?;
    reader
        .decode()
        .map_err(|e| Error::InvalidImage(format!("{}: {}", path.display(), e)))
}

/// Produce the canonical grayscale image for one photo.
pub fn normalize(image: &DynamicImage, config: &NormalizeConfig) -> Result<GrayImage> {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        return Err(Error::InvalidImage(format!("empty pixel grid {w}x{h}")));
    }
    if config.target_height == 0 {
        return Err(Error::InvalidImage("target height is zero".to_string()));
    }

    let gray = image.to_luma8();
    let new_w = config.scaled_width(w, h).max(1);
    let resized = imageops::resize(&gray, new_w, config.target_height, FilterType::Triangle);

    let (x0, y0) = config.crop_offsets();
    if x0 == 0 && y0 == 0 {
        return Ok(resized);
    }
    if x0 >= resized.width() || y0 >= resized.height() {
        return Err(Error::InvalidImage(format!(
            "crop ({x0}, {y0}) exceeds canonical image {}x{}",
            resized.width(),
            resized.height()
        )));
    }
    let cropped = imageops::crop_imm(
        &resized,
        x0,
        y0,
        resized.width() - x0,
        resized.height() - y0,
    )
    .to_image();

    tracing::debug!(
        "Normalized {}x{} -> {}x{}",
        w,
        h,
        cropped.width(),
        cropped.height()
    );
    Ok(cropped)
}
