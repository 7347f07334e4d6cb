//! scoutform — optical mark recognition for bubble-sheet scouting forms.
//!
//! Photos of printed robot-competition scouting forms are turned into
//! validated match records and merged into a CSV ledger keyed by
//! (match, team). The pipeline stages are:
//!
//! 1. **Normalize** – grayscale, fixed reference height, fixed crop.
//! 2. **Detect** – bubble candidates via edge contours or ink blobs.
//! 3. **Reconstruct** – rows by vertical gap, exact row-length check.
//! 4. **Classify** – per-bubble ink fraction, one selection per row.
//! 5. **Decode** – field table maps rows onto a [`ScoutingRecord`].
//!
//! Any stage failure rejects the whole form; no partial record is produced.
//!
//! # Public API
//! - [`FormReader`] and [`FormLayout`] as primary entry points
//! - [`LayoutProfile`] for the built-in form revisions
//! - [`seed_ledger`] and [`CsvLedger`] for the match ledger
//!
//! Stage functions are public for tooling and tests; the layout is the
//! only input they share.

mod api;
pub mod decode;
pub mod detector;
mod error;
pub mod fill;
pub mod grid;
mod layout;
pub mod ledger;
pub mod normalize;
mod pipeline;
mod record;
mod threshold;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::{FormReader, ReaderConfig};
pub use decode::{FieldMap, RowSource};
pub use detector::{BubbleDetection, BubbleDetector, DetectionConfig, DetectionStrategy};
pub use error::{Error, ErrorKind, Result};
pub use fill::{MultiMarkPolicy, RowSelection};
pub use grid::BubbleGrid;
pub use layout::{FormLayout, LayoutProfile};
pub use ledger::{seed_ledger, CsvLedger, LedgerRow, LedgerWriter, SeedOutcome};
pub use normalize::NormalizeConfig;
pub use pipeline::{DebugImages, FormReport};
pub use record::ScoutingRecord;
pub use threshold::ink_mask;
