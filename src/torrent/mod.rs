use core::fmt;
use serde_derive::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::path::Path;

mod error;
mod hashes;

pub use error::MetadataError;
pub use hashes::Hashes;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Torrent {
    /// The URL of the tracker. Not needed for verification, kept for the log line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announce: Option<String>,
    pub info: Info,
    #[serde(skip)]
    pub info_hash: Option<[u8; 20]>,
}

/// The `info` dictionary exactly as it appears in the file, keys we don't model included.
#[derive(Deserialize)]
struct RawInfo {
    info: serde_bencode::value::Value,
}

impl Torrent {
    /// Hashes the raw `info` dictionary, so private flags and other extension keys count too.
    fn compute_info_hash(&mut self, bytes: &[u8]) -> Result<(), MetadataError> {
        if self.info_hash.is_some() {
            return Ok(());
        }

        let raw: RawInfo = serde_bencode::from_bytes(bytes)?;
        let info_encoded = serde_bencode::to_bytes(&raw.info)?;

        let mut hasher = Sha1::new();
        hasher.update(&info_encoded);

        self.info_hash = Some(hasher.finalize().into());
        Ok(())
    }

    /// Hex form of the info hash, as shown by most clients.
    pub fn info_hash_hex(&self) -> Option<String> {
        self.info_hash.map(hex::encode)
    }

    #[tracing::instrument]
    pub fn open(file: impl AsRef<Path> + fmt::Debug) -> Result<Self, MetadataError> {
        let path = file.as_ref();
        let bytes = std::fs::read(path).map_err(|source| MetadataError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetadataError> {
        let mut t: Torrent = serde_bencode::from_bytes(bytes)?;
        t.compute_info_hash(bytes)?;

        tracing::info!(
            info_hash = %t.info_hash_hex().unwrap_or_default(),
            pieces = t.info.pieces.len(),
            "Succesfully opened {}",
            t.info.name
        );
        Ok(t)
    }

    pub fn length(&self) -> u64 {
        match &self.info.keys {
            Keys::SingleFile { length } => *length,
            Keys::MultiFile { files } => files
                .iter()
                .fold(0u64, |total, file| total.saturating_add(file.length)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Info {
    /// The suggested name to save the file (or directory) as.
    ///
    /// In the single file case, the name key is the name of a file, in the muliple file case, it's
    /// the name of a directory.
    pub name: String,

    /// The number of bytes in each piece the file is split into.
    ///
    /// Pieces are all the same length except for possibly the last one which may be truncated.
    #[serde(rename = "piece length")]
    pub piece_length: u64,

    /// Each entry of `pieces` is the SHA1 hash of the piece at the corresponding index.
    pub pieces: Hashes,

    #[serde(flatten)]
    pub keys: Keys,
}

/// There is a key `length` or a key `files`, but not both or neither.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Keys {
    /// If `length` is present then the download represents a single file.
    SingleFile {
        /// The length of the file in bytes.
        length: u64,
    },
    /// Otherwise it represents a set of files which go in a directory structure.
    ///
    /// For the purposes of the other keys in `Info`, the multi-file case is treated as only having
    /// a single file by concatenating the files in the order they appear in the files list.
    MultiFile { files: Vec<File> },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct File {
    /// The length of the file, in bytes.
    pub length: u64,

    /// Subdirectory names for this file, the last of which is the actual file name
    /// (a zero length list is an error case).
    pub path: Vec<String>,

    /// BEP-47 attribute string. `p` marks a padding file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,
}

impl File {
    pub fn is_padding(&self) -> bool {
        self.attr.as_deref().is_some_and(|attr| attr.contains('p'))
    }
}
