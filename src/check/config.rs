use std::path::PathBuf;

use crate::piece::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Directory the torrent's files are resolved against
    pub root: PathBuf,
    /// Upper bound on a single read while hashing
    pub chunk_size: usize,
    /// Reject files whose on-disk length differs from the torrent before hashing them
    pub check_size: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            chunk_size: DEFAULT_CHUNK_SIZE,
            check_size: false,
        }
    }
}

impl CheckConfig {
    pub fn with_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = path.into();
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_check_size(mut self, enabled: bool) -> Self {
        self.check_size = enabled;
        self
    }
}
