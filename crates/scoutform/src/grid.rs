//! Row/column reconstruction from unordered detections.
//!
//! Detections are sorted top-to-bottom; a vertical jump larger than the
//! layout's row gap closes the current row. Rows are then ordered
//! left-to-right and the row-length vector must match the layout exactly.
//!
//! No rectification happens here: on a skewed photo two rows whose centers
//! drift within `row_gap_px` of each other merge, and the form is rejected by
//! the topology check.

use crate::detector::BubbleDetection;
use crate::error::{Error, Result};
use crate::layout::FormLayout;

/// Bubbles ordered top-to-bottom by row and left-to-right within a row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BubbleGrid {
    rows: Vec<Vec<BubbleDetection>>,
}

impl BubbleGrid {
    pub fn rows(&self) -> &[Vec<BubbleDetection>] {
        &self.rows
    }

    pub fn row_lengths(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    pub fn n_bubbles(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Iterate `(row, column, bubble)` with 0-based indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &BubbleDetection)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, b)| (r, c, b)))
    }
}

/// Split detections into rows by vertical gap, without topology validation.
pub fn group_rows(detections: &[BubbleDetection], row_gap_px: f32) -> Vec<Vec<BubbleDetection>> {
    let mut sorted = detections.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut rows: Vec<Vec<BubbleDetection>> = Vec::new();
    let mut current: Vec<BubbleDetection> = Vec::new();
    let mut prev_y: Option<f32> = None;
    for b in sorted {
        if let Some(py) = prev_y {
            if b.y - py > row_gap_px {
                rows.push(std::mem::take(&mut current));
            }
        }
        prev_y = Some(b.y);
        current.push(b);
    }
    if !current.is_empty() {
        rows.push(current);
    }

    for row in &mut rows {
        row.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    rows
}

/// Reconstruct the grid and validate it against the layout topology.
pub fn reconstruct(detections: &[BubbleDetection], layout: &FormLayout) -> Result<BubbleGrid> {
    let rows = group_rows(detections, layout.row_gap_px);
    let found: Vec<usize> = rows.iter().map(Vec::len).collect();
    if found != layout.expected_rows {
        tracing::debug!("Row lengths {:?}", found);
        return Err(Error::GridTopologyMismatch {
            expected: layout.expected_rows.clone(),
            found,
        });
    }
    Ok(BubbleGrid { rows })
}
