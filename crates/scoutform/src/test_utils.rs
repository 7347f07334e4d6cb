//! Synthetic bubble sheets for image-based unit tests.

use image::{GrayImage, Luma};

use crate::fill::RowSelection;
use crate::layout::FormLayout;

pub(crate) const PAPER: u8 = 250;
pub(crate) const INK: u8 = 40;
const OUTLINE_THICKNESS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BubbleStyle {
    /// Printed, unmarked bubble: a thin ring.
    Outline,
    /// Marked bubble: a solid disk.
    Filled,
}

/// Draw one bubble centered at `center` with outer radius `radius`.
pub(crate) fn draw_bubble(img: &mut GrayImage, center: [f32; 2], radius: f32, style: BubbleStyle) {
    let inner = match style {
        BubbleStyle::Outline => radius - OUTLINE_THICKNESS,
        BubbleStyle::Filled => -1.0,
    };
    let (w, h) = img.dimensions();
    let x0 = (center[0] - radius - 1.0).floor().max(0.0) as u32;
    let y0 = (center[1] - radius - 1.0).floor().max(0.0) as u32;
    let x1 = ((center[0] + radius + 1.0).ceil() as u32).min(w);
    let y1 = ((center[1] + radius + 1.0).ceil() as u32).min(h);
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 - center[0];
            let dy = y as f32 - center[1];
            let d = (dx * dx + dy * dy).sqrt();
            if d <= radius && d > inner {
                img.put_pixel(x, y, Luma([INK]));
            }
        }
    }
}

/// Geometry of a rendered sheet in canonical pixels.
#[derive(Debug, Clone)]
pub(crate) struct SheetSpec {
    pub rows: Vec<usize>,
    pub width: u32,
    pub height: u32,
    /// Center of row 0, column 0.
    pub origin: [f32; 2],
    pub col_step: f32,
    pub row_step: f32,
    pub radius: f32,
    /// Vertical drift per column, simulating a rotated photo.
    pub skew_px_per_col: f32,
}

impl SheetSpec {
    pub(crate) fn for_layout(layout: &FormLayout) -> Self {
        Self {
            rows: layout.expected_rows.clone(),
            width: 1100,
            height: 1700,
            origin: [80.0, 70.0],
            col_step: 55.0,
            row_step: 60.0,
            radius: 20.0,
            skew_px_per_col: 0.0,
        }
    }

    pub(crate) fn bubble_center(&self, row: usize, col: usize) -> [f32; 2] {
        [
            self.origin[0] + col as f32 * self.col_step,
            self.origin[1] + row as f32 * self.row_step + col as f32 * self.skew_px_per_col,
        ]
    }
}

/// Render a sheet; `selections[row] = Some(c)` fills the 1-based column `c`.
pub(crate) fn render_sheet(spec: &SheetSpec, selections: &[RowSelection]) -> GrayImage {
    let mut img = GrayImage::from_pixel(spec.width, spec.height, Luma([PAPER]));
    for (r, &len) in spec.rows.iter().enumerate() {
        let selected = selections.get(r).copied().flatten();
        for c in 0..len {
            let style = if selected == Some(c as u32 + 1) {
                BubbleStyle::Filled
            } else {
                BubbleStyle::Outline
            };
            draw_bubble(&mut img, spec.bubble_center(r, c), spec.radius, style);
        }
    }
    img
}

/// Selections for a complete form: team/match digits as written, auto start
/// and shoot location marked, every optional row blank.
pub(crate) fn form_selections(
    n_rows: usize,
    team: [u32; 4],
    match_digits: [u32; 3],
) -> Vec<RowSelection> {
    let mut s = vec![None; n_rows];
    for (i, d) in team.iter().enumerate() {
        s[i] = Some(d + 1);
    }
    for (i, d) in match_digits.iter().enumerate() {
        s[4 + i] = Some(d + 1);
    }
    s[7] = Some(1);
    s[17] = Some(1);
    s
}
