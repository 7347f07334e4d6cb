//! High-level reading API.
//!
//! [`FormReader`] is the primary entry point. It wraps a [`ReaderConfig`]
//! (layout profile plus debug switch) and reads forms from a path, a decoded
//! image, or an already-canonical grayscale frame.

use image::{DynamicImage, GrayImage};
use std::path::Path;

use crate::error::Result;
use crate::layout::{FormLayout, LayoutProfile};
use crate::normalize::load_image;
use crate::pipeline::{self, FormReport};

/// Reader configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub layout: FormLayout,
    /// Attach the canonical frame and a detection overlay to each report.
    pub visualize: bool,
}

/// Primary form-reading interface.
///
/// Create once per layout, read many photos.
///
/// # Examples
///
/// ```no_run
/// use scoutform::{FormReader, LayoutProfile};
/// use std::path::Path;
///
/// let reader = FormReader::for_profile(LayoutProfile::ContourV1);
/// let report = reader.read_path(Path::new("forms/IMG_0001.jpg")).unwrap();
/// println!("match {} team {}", report.record.match_number, report.record.team);
/// ```
pub struct FormReader {
    config: ReaderConfig,
}

impl FormReader {
    pub fn new(layout: FormLayout) -> Self {
        Self::with_config(ReaderConfig {
            layout,
            visualize: false,
        })
    }

    pub fn for_profile(profile: LayoutProfile) -> Self {
        Self::new(profile.layout())
    }

    /// Load a layout JSON file and create a reader in one step.
    pub fn from_layout_file(path: &Path) -> Result<Self> {
        Ok(Self::new(FormLayout::from_json_file(path)?))
    }

    /// Create with full config control.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Mutable access for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut ReaderConfig {
        &mut self.config
    }

    pub fn layout(&self) -> &FormLayout {
        &self.config.layout
    }

    /// Decode the photo at `path` and read it.
    pub fn read_path(&self, path: &Path) -> Result<FormReport> {
        let image = load_image(path)?;
        tracing::debug!(
            "Loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        self.read_image(&image)
    }

    /// Normalize and read a decoded photo.
    pub fn read_image(&self, image: &DynamicImage) -> Result<FormReport> {
        pipeline::read_image(image, &self.config)
    }

    /// Read a frame already in the layout's canonical geometry.
    pub fn read_canonical(&self, gray: &GrayImage) -> Result<FormReport> {
        pipeline::read_canonical(gray, &self.config)
    }
}
