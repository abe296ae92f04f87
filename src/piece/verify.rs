use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use super::{PieceError, PieceIndex, PieceVerdict, DEFAULT_CHUNK_SIZE};
use crate::check::CheckConfig;
use crate::file::{FileEntry, FileSlice, FileStorage};

const ZEROS: [u8; 16384] = [0; 16384];

/// Checks pieces against the files under a data root, hashing each piece at most once.
pub struct PieceVerifier<'a, S: FileStorage + ?Sized> {
    storage: &'a S,
    root: PathBuf,
    chunk_size: usize,
    verdicts: Vec<PieceVerdict>,
    buffer: Vec<u8>,
    hashed: u32,
}

impl<'a, S: FileStorage + ?Sized> PieceVerifier<'a, S> {
    /// Creates a verifier with every piece still unchecked.
    ///
    /// # Arguments
    ///
    /// * `storage` - Piece hashes and the piece to file mapping.
    /// * `config` - Data root and read chunk size. A chunk size of 0 falls back to
    ///   `DEFAULT_CHUNK_SIZE`.
    ///
    /// # Returns
    ///
    /// * `PieceVerifier` - Holds one cached verdict per piece of `storage`. Nothing is read from
    ///   disk until `verify` is called.
    pub fn new(storage: &'a S, config: &CheckConfig) -> Self {
        let chunk_size = if config.chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            config.chunk_size
        };

        Self {
            storage,
            root: config.root.clone(),
            chunk_size,
            verdicts: vec![PieceVerdict::Unknown; storage.num_pieces() as usize],
            buffer: Vec::new(),
            hashed: 0,
        }
    }

    pub fn storage(&self) -> &'a S {
        self.storage
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cached verdict for `piece`, without doing any I/O.
    pub fn verdict(&self, piece: PieceIndex) -> PieceVerdict {
        self.verdicts
            .get(piece as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Number of pieces actually read and hashed so far.
    pub fn pieces_hashed(&self) -> u32 {
        self.hashed
    }

    /// Returns whether `piece` is intact on disk. Failures of any kind only make the piece
    /// invalid; the reason is logged at debug level.
    pub fn verify(&mut self, piece: PieceIndex) -> bool {
        match self.verdict(piece) {
            PieceVerdict::Valid => return true,
            PieceVerdict::Invalid => return false,
            PieceVerdict::Unknown => {}
        }

        if piece as usize >= self.verdicts.len() {
            warn!(piece, "piece index out of range");
            return false;
        }

        self.hashed += 1;
        let verdict = match self.check_piece(piece) {
            Ok(()) => {
                trace!(piece, "piece verified");
                PieceVerdict::Valid
            }
            Err(err) => {
                debug!(piece, "piece failed: {}", err);
                PieceVerdict::Invalid
            }
        };

        self.verdicts[piece as usize] = verdict;
        verdict == PieceVerdict::Valid
    }

    fn check_piece(&mut self, piece: PieceIndex) -> Result<(), PieceError> {
        let storage = self.storage;
        let expected = storage.hash_for_piece(piece);
        let size = storage.piece_size(piece);

        let mut hasher = Sha1::new();
        for slice in storage.map_block(piece, 0, size) {
            let file = storage.file_at(slice.file_index);
            if file.file_base != 0 {
                return Err(PieceError::UnsupportedFileLayout {
                    path: file.path.clone(),
                    file_base: file.file_base,
                });
            }

            if file.pad {
                hash_zeros(&mut hasher, slice.size);
            } else {
                self.hash_slice(&mut hasher, file, &slice)?;
            }
        }

        let actual: [u8; 20] = hasher.finalize().into();
        if actual != *expected {
            return Err(PieceError::ChecksumMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }
        Ok(())
    }

    // The file handle lives only for this slice.
    fn hash_slice(
        &mut self,
        hasher: &mut Sha1,
        file: &FileEntry,
        slice: &FileSlice,
    ) -> Result<(), PieceError> {
        let path = self.root.join(&file.path);
        let mut handle = match File::open(&path) {
            Ok(handle) => handle,
            Err(source) => return Err(PieceError::FileMissing { path, source }),
        };

        if let Err(source) = handle.seek(SeekFrom::Start(slice.offset)) {
            return Err(PieceError::Io { path, source });
        }

        let mut remaining = slice.size;
        while remaining > 0 {
            let len = remaining.min(self.chunk_size as u64) as usize;
            if self.buffer.len() < len {
                self.buffer.resize(len, 0);
            }

            let chunk = &mut self.buffer[..len];
            if let Err(source) = handle.read_exact(chunk) {
                return Err(if source.kind() == io::ErrorKind::UnexpectedEof {
                    PieceError::FileTruncated {
                        path,
                        offset: slice.offset + (slice.size - remaining),
                    }
                } else {
                    PieceError::Io { path, source }
                });
            }

            hasher.update(&*chunk);
            remaining -= len as u64;
        }

        Ok(())
    }
}

fn hash_zeros(hasher: &mut Sha1, mut remaining: u64) {
    while remaining > 0 {
        let len = remaining.min(ZEROS.len() as u64) as usize;
        hasher.update(&ZEROS[..len]);
        remaining -= len as u64;
    }
}
