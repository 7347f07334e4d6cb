//! Form-reading pipeline.
//!
//! Internal glue that wires the stages together in a fixed order:
//! normalize -> detect -> reconstruct -> classify -> decode.
//!
//! Each stage returns an explicit [`crate::Error`] and the first failure stops
//! the run; a later stage never sees invalid input. Algorithmic primitives
//! live in `crate::detector`, `crate::grid`, `crate::fill` and `crate::decode`.

mod result;
mod run;

pub use result::{DebugImages, FormReport};

pub(crate) use run::{read_canonical, read_image};
