//! Helpers for building on-disk torrents in unit tests.

use sha1::{Digest, Sha1};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::check::CheckConfig;
use crate::file::{FileEntry, TorrentLayout};

pub fn content(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + 7) as u8 ^ (i >> 8) as u8).collect()
}

pub fn piece_hashes(data: &[u8], piece_length: usize) -> Vec<[u8; 20]> {
    data.chunks(piece_length)
        .map(|chunk| Sha1::digest(chunk).into())
        .collect()
}

/// A data directory whose files match the layout's piece hashes.
pub struct Fixture {
    pub dir: TempDir,
    pub layout: TorrentLayout,
}

impl Fixture {
    pub fn new(piece_length: u64, files: &[(&str, u64)]) -> Self {
        let entries = files
            .iter()
            .map(|&(name, size)| FileEntry::new(name, size))
            .collect();
        Self::with_entries(piece_length, entries)
    }

    /// Padding entries hash as zeros and are not written to disk.
    pub fn with_entries(piece_length: u64, entries: Vec<FileEntry>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let total: u64 = entries.iter().map(|e| e.size).sum();
        let mut data = content(total as usize);

        let mut offset = 0usize;
        for entry in &entries {
            let range = offset..offset + entry.size as usize;
            if entry.pad {
                data[range].fill(0);
            } else {
                let path = dir.path().join(&entry.path);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).unwrap();
                }
                fs::write(&path, &data[range]).unwrap();
            }
            offset += entry.size as usize;
        }

        let hashes = piece_hashes(&data, piece_length as usize);
        let layout = TorrentLayout::new(piece_length, hashes, entries).unwrap();
        Self { dir, layout }
    }

    pub fn config(&self) -> CheckConfig {
        CheckConfig::default().with_root(self.dir.path())
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn flip_byte(&self, name: &str, offset: usize) {
        let path = self.path(name);
        let mut bytes = fs::read(&path).unwrap();
        bytes[offset] ^= 0xff;
        fs::write(&path, bytes).unwrap();
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.path(name)).unwrap();
    }

    pub fn append(&self, name: &str, bytes: &[u8]) {
        let mut file = OpenOptions::new().append(true).open(self.path(name)).unwrap();
        file.write_all(bytes).unwrap();
    }

    pub fn truncate(&self, name: &str, len: u64) {
        let file = OpenOptions::new().write(true).open(self.path(name)).unwrap();
        file.set_len(len).unwrap();
    }
}
