use std::ops::RangeInclusive;

use crate::piece::PieceIndex;

mod config;
mod driver;

pub use config::CheckConfig;
pub use driver::{file_range, verify_torrent};

/// The contiguous pieces holding a file's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRange {
    pub file_index: usize,
    pub start: PieceIndex,
    pub end: PieceIndex,
}

impl FileRange {
    pub fn pieces(&self) -> RangeInclusive<PieceIndex> {
        self.start..=self.end
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Files considered, padding excluded
    pub files: usize,
    pub valid_files: usize,
    pub pieces_hashed: u32,
}
