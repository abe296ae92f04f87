use std::path::PathBuf;

use super::{FileEntry, FileSlice, FileStorage};
use crate::piece::PieceIndex;
use crate::torrent::{Keys, MetadataError, Torrent};

/// Files of a torrent laid out back to back in piece space.
#[derive(Debug, Clone)]
pub struct TorrentLayout {
    piece_length: u64,
    total_length: u64,
    hashes: Vec<[u8; 20]>,
    files: Vec<FileEntry>,
}

impl TorrentLayout {
    /// Lays `files` out in order, assigning each its offset in the concatenated data.
    pub fn new(
        piece_length: u64,
        hashes: Vec<[u8; 20]>,
        mut files: Vec<FileEntry>,
    ) -> Result<Self, MetadataError> {
        if piece_length == 0 {
            return Err(MetadataError::ZeroPieceLength);
        }

        let mut total_length = 0u64;
        for file in &mut files {
            file.offset = total_length;
            total_length = total_length
                .checked_add(file.size)
                .ok_or_else(|| MetadataError::LengthOverflow(file.path.clone()))?;
        }

        let expected = total_length.div_ceil(piece_length);
        if expected != hashes.len() as u64 {
            return Err(MetadataError::PieceCountMismatch {
                expected,
                actual: hashes.len(),
                total_length,
            });
        }

        Ok(Self {
            piece_length,
            total_length,
            hashes,
            files,
        })
    }

    pub fn from_torrent(torrent: &Torrent) -> Result<Self, MetadataError> {
        let info = &torrent.info;
        let name = safe_path([info.name.as_str()])?;

        let files = match &info.keys {
            Keys::SingleFile { length } => vec![FileEntry::new(name, *length)],
            Keys::MultiFile { files } => files
                .iter()
                .map(|file| {
                    let path = name.join(safe_path(file.path.iter().map(String::as_str))?);
                    Ok(if file.is_padding() {
                        FileEntry::padding(path, file.length)
                    } else {
                        FileEntry::new(path, file.length)
                    })
                })
                .collect::<Result<Vec<_>, MetadataError>>()?,
        };

        Self::new(info.piece_length, info.pieces.0.clone(), files)
    }

    pub fn piece_length(&self) -> u64 {
        self.piece_length
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }
}

impl FileStorage for TorrentLayout {
    fn num_pieces(&self) -> u32 {
        self.hashes.len() as u32
    }

    fn num_files(&self) -> usize {
        self.files.len()
    }

    fn piece_size(&self, piece: PieceIndex) -> u64 {
        let start = piece as u64 * self.piece_length;
        self.piece_length.min(self.total_length.saturating_sub(start))
    }

    fn hash_for_piece(&self, piece: PieceIndex) -> &[u8; 20] {
        &self.hashes[piece as usize]
    }

    // A block can be split over several files, so walk forward from the first file that reaches
    // past the block start until the whole block is covered.
    fn map_block(&self, piece: PieceIndex, offset: u64, size: u64) -> Vec<FileSlice> {
        let start = (piece as u64)
            .saturating_mul(self.piece_length)
            .saturating_add(offset);
        let end = start.saturating_add(size).min(self.total_length);

        let first = self
            .files
            .partition_point(|file| file.offset + file.size <= start);

        let mut slices = Vec::new();
        let mut current_offset = start;

        for (file_index, file) in self.files.iter().enumerate().skip(first) {
            if current_offset >= end {
                break;
            }

            let file_end = file.offset + file.size;
            if current_offset < file_end {
                let bytes_in_this_file = end.min(file_end) - current_offset;
                slices.push(FileSlice {
                    file_index,
                    offset: current_offset - file.offset,
                    size: bytes_in_this_file,
                });
                current_offset += bytes_in_this_file;
            }
        }

        slices
    }

    fn map_file(&self, file: usize, offset: u64) -> PieceIndex {
        ((self.files[file].offset + offset) / self.piece_length) as PieceIndex
    }

    fn file_at(&self, file: usize) -> &FileEntry {
        &self.files[file]
    }
}

/// Joins path components from the metainfo, refusing anything that could escape the data root.
fn safe_path<'a>(components: impl IntoIterator<Item = &'a str>) -> Result<PathBuf, MetadataError> {
    let mut path = PathBuf::new();
    for component in components {
        if component.is_empty()
            || component == "."
            || component == ".."
            || component.contains(|c: char| c == '/' || c == '\\')
        {
            return Err(MetadataError::UnsafePath(component.to_string()));
        }
        path.push(component);
    }

    if path.as_os_str().is_empty() {
        return Err(MetadataError::UnsafePath(String::new()));
    }
    Ok(path)
}
