//! Global Otsu binarization shared by the detector and the fill classifier.

use image::{GrayImage, Luma};

/// Inverted Otsu binarization: ink (dark) pixels become 255, paper 0.
///
/// A pixel is ink when its luma is at or below the Otsu level.
pub fn ink_mask(gray: &GrayImage) -> GrayImage {
    let level = imageproc::contrast::otsu_level(gray);
    let mut out = GrayImage::new(gray.width(), gray.height());
    for (src, dst) in gray.pixels().zip(out.pixels_mut()) {
        *dst = if src[0] <= level {
            Luma([255u8])
        } else {
            Luma([0u8])
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_pixels_become_ink() {
        let mut img = GrayImage::from_pixel(20, 10, Luma([240]));
        for x in 0..5 {
            img.put_pixel(x, 3, Luma([30]));
        }
        let mask = ink_mask(&img);
        assert_eq!(mask.get_pixel(0, 3)[0], 255);
        assert_eq!(mask.get_pixel(4, 3)[0], 255);
        assert_eq!(mask.get_pixel(5, 3)[0], 0);
        assert_eq!(mask.get_pixel(10, 8)[0], 0);
    }
}
