//! Stage orchestration and the debug overlay.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;

use super::{DebugImages, FormReport};
use crate::api::ReaderConfig;
use crate::decode::decode;
use crate::detector::detect_bubbles;
use crate::error::Result;
use crate::fill::{classify, RowSelection};
use crate::grid::{reconstruct, BubbleGrid};
use crate::normalize::normalize;

const OUTLINE: Rgb<u8> = Rgb([0, 200, 0]);
const SELECTED: Rgb<u8> = Rgb([220, 0, 0]);

/// Run every stage after normalization on a canonical frame.
pub(crate) fn read_canonical(gray: &GrayImage, config: &ReaderConfig) -> Result<FormReport> {
    let layout = &config.layout;

    let bubbles = detect_bubbles(gray, layout)?;
    let grid = reconstruct(&bubbles, layout)?;
    let selections = classify(gray, &grid, layout);
    tracing::debug!(
        "{} of {} rows marked",
        selections.iter().filter(|s| s.is_some()).count(),
        selections.len()
    );
    let record = decode(&selections, &layout.fields)?;
    tracing::info!(
        "Decoded match {} team {} ({})",
        record.match_number,
        record.team,
        layout.name
    );

    let debug = config.visualize.then(|| DebugImages {
        canonical: gray.clone(),
        overlay: draw_overlay(gray, &grid, &selections),
    });

    Ok(FormReport {
        record,
        image_size: [gray.width(), gray.height()],
        bubble_count: bubbles.len(),
        selections,
        debug,
    })
}

/// Normalize `image` into the layout's canonical frame, then read it.
pub(crate) fn read_image(image: &DynamicImage, config: &ReaderConfig) -> Result<FormReport> {
    let gray = normalize(image, &config.layout.normalize)?;
    read_canonical(&gray, config)
}

fn draw_overlay(gray: &GrayImage, grid: &BubbleGrid, selections: &[RowSelection]) -> RgbImage {
    let mut out = DynamicImage::ImageLuma8(gray.clone()).to_rgb8();
    for (r, c, b) in grid.iter() {
        let center = (b.x.round() as i32, b.y.round() as i32);
        let radius = b.radius.round() as i32;
        draw_hollow_circle_mut(&mut out, center, radius, OUTLINE);
        if selections.get(r).copied().flatten() == Some(c as u32 + 1) {
            for grow in 2..5 {
                draw_hollow_circle_mut(&mut out, center, radius + grow, SELECTED);
            }
        }
    }
    out
}
