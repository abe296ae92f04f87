use std::io;
use std::path::PathBuf;

/// Why a piece failed. Only logged: every variant makes the piece `Invalid`.
#[derive(thiserror::Error, Debug)]
pub enum PieceError {
    #[error("cannot open {}: {source}", path.display())]
    FileMissing { path: PathBuf, source: io::Error },

    #[error("{} is truncated: short read at byte {offset}", path.display())]
    FileTruncated { path: PathBuf, offset: u64 },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("{} starts at file base {file_base}, only 0 is supported", path.display())]
    UnsupportedFileLayout { path: PathBuf, file_base: u64 },

    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}
