use std::io;
use std::path::PathBuf;

/// Problems with the torrent metadata itself. Any of these aborts the run.
#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read torrent file {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Bencode decoding error: {0}")]
    BencodeDecoding(#[from] serde_bencode::Error),
    #[error("Piece length must be non-zero")]
    ZeroPieceLength,
    #[error("Torrent has {actual} piece hashes but {total_length} bytes need {expected}")]
    PieceCountMismatch {
        expected: u64,
        actual: usize,
        total_length: u64,
    },
    #[error("Total torrent length overflows at {}", .0.display())]
    LengthOverflow(PathBuf),
    #[error("Unsafe path in torrent: {0:?}")]
    UnsafePath(String),
}
