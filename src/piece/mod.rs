pub type PieceIndex = u32;

// Reads are capped at 1 MiB so memory use does not grow with the piece length.
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 20;

/// Cached result of checking one piece. Never goes back to `Unknown` once set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PieceVerdict {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

mod error;
mod verify;

pub use error::PieceError;
pub use verify::PieceVerifier;
