/// Which bubble-finding strategy a layout uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Edge contours → enclosing circles → solid-disk mask → outer contours.
    #[default]
    Contour,
    /// Binarized blobs filtered by area and inertia.
    Blob,
}

/// Open interval of accepted bubble radii in canonical pixels.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RadiusBand {
    pub min_px: f32,
    pub max_px: f32,
}

impl Default for RadiusBand {
    fn default() -> Self {
        Self {
            min_px: 15.0,
            max_px: 30.0,
        }
    }
}

impl RadiusBand {
    /// Strict containment: `min_px < r < max_px`.
    pub fn contains(&self, r: f32) -> bool {
        r > self.min_px && r < self.max_px
    }
}

/// Tuning for [`DetectionStrategy::Contour`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ContourParams {
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Detections closer than this fraction of the image size to any border
    /// are treated as border artifacts.
    pub edge_margin_frac: f32,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            canny_low: 75.0,
            canny_high: 200.0,
            edge_margin_frac: 0.01,
        }
    }
}

/// Tuning for [`DetectionStrategy::Blob`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BlobParams {
    /// Minimum blob area (px²).
    pub min_area_px: f32,
    /// Maximum blob area (px²).
    pub max_area_px: f32,
    /// Minimum minor/major inertia ratio (1 = perfect circle).
    pub min_inertia_ratio: f32,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            min_area_px: 700.0,
            max_area_px: 2800.0,
            min_inertia_ratio: 0.5,
        }
    }
}

/// Complete detector configuration carried by a form layout.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub strategy: DetectionStrategy,
    pub radius: RadiusBand,
    pub contour: ContourParams,
    pub blob: BlobParams,
}

impl DetectionConfig {
    /// Configuration for the blob-based form revision.
    pub fn blob() -> Self {
        Self {
            strategy: DetectionStrategy::Blob,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let r = self.radius;
        if !r.min_px.is_finite() || !r.max_px.is_finite() || r.min_px < 0.0 {
            return Err("radius band must be finite and non-negative".to_string());
        }
        if r.min_px >= r.max_px {
            return Err(format!(
                "radius band min ({}) must be < max ({})",
                r.min_px, r.max_px
            ));
        }
        let c = &self.contour;
        if !(0.0..0.5).contains(&c.edge_margin_frac) {
            return Err("edge_margin_frac must be in [0, 0.5)".to_string());
        }
        if c.canny_low > c.canny_high {
            return Err("canny_low must be <= canny_high".to_string());
        }
        let b = &self.blob;
        if b.min_area_px >= b.max_area_px {
            return Err("blob min_area_px must be < max_area_px".to_string());
        }
        if !(0.0..=1.0).contains(&b.min_inertia_ratio) {
            return Err("blob min_inertia_ratio must be in [0, 1]".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_band_is_open() {
        let band = RadiusBand::default();
        assert!(!band.contains(15.0));
        assert!(band.contains(15.5));
        assert!(band.contains(29.9));
        assert!(!band.contains(30.0));
    }

    #[test]
    fn defaults_validate() {
        assert!(DetectionConfig::default().validate().is_ok());
        assert!(DetectionConfig::blob().validate().is_ok());
    }

    #[test]
    fn inverted_band_rejected() {
        let mut cfg = DetectionConfig::default();
        cfg.radius = RadiusBand {
            min_px: 30.0,
            max_px: 10.0,
        };
        assert!(cfg.validate().is_err());
    }
}
