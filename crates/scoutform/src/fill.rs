//! Filled/unfilled classification of grid cells.
//!
//! Each bubble's fill fraction is the share of ink pixels inside its disk.
//! Over-threshold bubbles are marks; a row reports the column of one mark
//! chosen by [`MultiMarkPolicy`], or `None`.

use image::GrayImage;

use crate::detector::BubbleDetection;
use crate::grid::BubbleGrid;
use crate::layout::FormLayout;
use crate::threshold::ink_mask;

/// 1-based column of the marked bubble in a row, if any.
pub type RowSelection = Option<u32>;

/// Which mark wins when a row has more than one over-threshold bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiMarkPolicy {
    /// The last mark in left-to-right scan order.
    #[default]
    Rightmost,
    /// The first mark in left-to-right scan order.
    Leftmost,
}

/// Fraction of ink pixels inside the bubble's disk, in `[0, 1]`.
///
/// `mask` is an ink mask (ink = non-zero). Pixels outside the image do not
/// count toward either total.
pub fn fill_fraction(mask: &GrayImage, bubble: &BubbleDetection) -> f32 {
    let (w, h) = mask.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }
    let r = bubble.radius.max(0.0);
    let r2 = r * r;
    let x0 = (bubble.x - r).floor().max(0.0) as u32;
    let y0 = (bubble.y - r).floor().max(0.0) as u32;
    let x1 = ((bubble.x + r).ceil().max(0.0) as u32).min(w.saturating_sub(1));
    let y1 = ((bubble.y + r).ceil().max(0.0) as u32).min(h.saturating_sub(1));

    let mut total = 0u32;
    let mut ink = 0u32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - bubble.x;
            let dy = y as f32 - bubble.y;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            total += 1;
            if mask.get_pixel(x, y)[0] != 0 {
                ink += 1;
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        ink as f32 / total as f32
    }
}

/// Pick the selected column (1-based) from one row's fill fractions.
pub fn select_in_row(fractions: &[f32], threshold: f32, policy: MultiMarkPolicy) -> RowSelection {
    let mut marked = fractions
        .iter()
        .enumerate()
        .filter(|&(_, &f)| f > threshold)
        .map(|(i, _)| i as u32 + 1);
    match policy {
        MultiMarkPolicy::Rightmost => marked.last(),
        MultiMarkPolicy::Leftmost => marked.next(),
    }
}

/// Per-bubble fill fractions, row by row.
pub fn fill_fractions(gray: &GrayImage, grid: &BubbleGrid) -> Vec<Vec<f32>> {
    let mask = ink_mask(gray);
    grid.rows()
        .iter()
        .map(|row| row.iter().map(|b| fill_fraction(&mask, b)).collect())
        .collect()
}

/// Classify every row of the grid.
pub fn classify(gray: &GrayImage, grid: &BubbleGrid, layout: &FormLayout) -> Vec<RowSelection> {
    let fractions = fill_fractions(gray, grid);
    let selections: Vec<RowSelection> = fractions
        .iter()
        .map(|row| select_in_row(row, layout.fill_threshold, layout.multi_mark))
        .collect();

    let multi = fractions
        .iter()
        .filter(|row| row.iter().filter(|&&f| f > layout.fill_threshold).count() > 1)
        .count();
    if multi > 0 {
        tracing::warn!(
            "{} row(s) carry more than one mark; kept the {:?} one",
            multi,
            layout.multi_mark
        );
    }
    selections
}
