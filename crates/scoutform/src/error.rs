//! Error taxonomy shared by every pipeline stage and the ledger.
//!
//! Each stage returns an explicit [`Error`]; callers use [`Error::kind`] to
//! classify a failure without matching on payloads.

use std::path::PathBuf;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidImage,
    BubbleCountMismatch,
    GridTopologyMismatch,
    IncompleteForm,
    MatchNotFound,
    Schedule,
    Layout,
    Io,
    Csv,
}

impl ErrorKind {
    /// `true` for failures confined to a single form image.
    ///
    /// Schedule and layout failures abort the whole run.
    pub fn is_per_image(self) -> bool {
        !matches!(self, Self::Schedule | Self::Layout)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("incorrect bubble count: expected {expected}, found {found}")]
    BubbleCountMismatch { expected: usize, found: usize },

    #[error("incorrect bubble matrix: expected rows {expected:?}, found {found:?}")]
    GridTopologyMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("{field} not defined")]
    IncompleteForm { field: &'static str },

    #[error("match {match_number} team {team} not found in ledger")]
    MatchNotFound { match_number: u32, team: u32 },

    #[error("match schedule {}: {reason}", path.display())]
    Schedule { path: PathBuf, reason: String },

    #[error("layout: {0}")]
    Layout(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidImage(_) => ErrorKind::InvalidImage,
            Self::BubbleCountMismatch { .. } => ErrorKind::BubbleCountMismatch,
            Self::GridTopologyMismatch { .. } => ErrorKind::GridTopologyMismatch,
            Self::IncompleteForm { .. } => ErrorKind::IncompleteForm,
            Self::MatchNotFound { .. } => ErrorKind::MatchNotFound,
            Self::Schedule { .. } => ErrorKind::Schedule,
            Self::Layout(_) => ErrorKind::Layout,
            Self::Io(_) => ErrorKind::Io,
            Self::Csv(_) => ErrorKind::Csv,
        }
    }

    pub(crate) fn schedule(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::Schedule {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::InvalidImage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        let e = Error::IncompleteForm { field: "autoStart" };
        assert_eq!(e.kind(), ErrorKind::IncompleteForm);
        assert_eq!(e.to_string(), "autoStart not defined");

        let e = Error::BubbleCountMismatch {
            expected: 219,
            found: 200,
        };
        assert_eq!(e.kind(), ErrorKind::BubbleCountMismatch);
        assert!(e.kind().is_per_image());
    }

    #[test]
    fn schedule_and_layout_are_fatal() {
        let e = Error::schedule(std::path::Path::new("matchSchedule.csv"), "missing");
        assert!(!e.kind().is_per_image());
        assert!(!ErrorKind::Layout.is_per_image());
        assert!(e.to_string().contains("matchSchedule.csv"));
    }
}
