use std::path::PathBuf;

use crate::piece::PieceIndex;

mod layout;

pub use layout::TorrentLayout;

/// Piece and file geometry of a torrent, as needed to check it against the disk.
pub trait FileStorage {
    /// Number of pieces in the torrent.
    ///
    /// # Returns
    ///
    /// * `u32` - One more than the highest valid `PieceIndex`, 0 for a torrent without data.
    fn num_pieces(&self) -> u32;

    /// Number of files in the torrent, padding files included.
    ///
    /// # Returns
    ///
    /// * `usize` - Count of entries reachable through `file_at`.
    fn num_files(&self) -> usize;

    /// Bytes in `piece`. Only the last piece may be shorter than the piece length.
    fn piece_size(&self, piece: PieceIndex) -> u64;
    fn hash_for_piece(&self, piece: PieceIndex) -> &[u8; 20];
    /// Splits `size` bytes starting at `offset` within `piece` into per-file slices, in torrent
    /// order.
    fn map_block(&self, piece: PieceIndex, offset: u64, size: u64) -> Vec<FileSlice>;
    /// Piece holding byte `offset` of file `file`.
    fn map_file(&self, file: usize, offset: u64) -> PieceIndex;

    /// Looks up a file of the torrent.
    ///
    /// # Arguments
    ///
    /// * `file` - Index into the torrent's file list, below `num_files()`.
    ///
    /// # Returns
    ///
    /// * `&FileEntry` - Path relative to the data root, declared size and torrent offset.
    ///
    /// Panics if `file` is out of range.
    fn file_at(&self, file: usize) -> &FileEntry;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the data root.
    pub path: PathBuf,
    pub size: u64,
    /// Position of the first byte in the concatenated torrent data.
    pub offset: u64,
    /// Where the file's data begins inside the on-disk file. Only 0 is supported.
    pub file_base: u64,
    /// BEP-47 padding file. Its bytes are zeros and never stored on disk.
    pub pad: bool,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            offset: 0,
            file_base: 0,
            pad: false,
        }
    }

    pub fn padding(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            pad: true,
            ..Self::new(path, size)
        }
    }
}

/// The part of one piece that falls inside one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSlice {
    pub file_index: usize,
    /// Byte offset within the file.
    pub offset: u64,
    pub size: u64,
}
