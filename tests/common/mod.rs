#![allow(dead_code)]

use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use torrent_verify::torrent::{File, Hashes, Info, Keys, Torrent};

/// A multi-file torrent written to disk together with its data directory.
pub struct Download {
    pub dir: TempDir,
    pub torrent_path: PathBuf,
    pub name: String,
}

impl Download {
    pub fn new(name: &str, piece_length: u64, files: &[(&str, u64)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let total: u64 = files.iter().map(|(_, size)| size).sum();
        let data: Vec<u8> = (0..total as usize).map(|i| (i % 251) as u8).collect();

        let mut offset = 0usize;
        for (file, size) in files {
            let path = dir.path().join(name).join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, &data[offset..offset + *size as usize]).unwrap();
            offset += *size as usize;
        }

        let pieces: Vec<[u8; 20]> = data
            .chunks(piece_length as usize)
            .map(|chunk| Sha1::digest(chunk).into())
            .collect();

        let torrent = Torrent {
            announce: Some("http://tracker.example/announce".to_string()),
            info: Info {
                name: name.to_string(),
                piece_length,
                pieces: Hashes(pieces),
                keys: Keys::MultiFile {
                    files: files
                        .iter()
                        .map(|(file, size)| File {
                            length: *size,
                            path: file.split('/').map(str::to_string).collect(),
                            attr: None,
                        })
                        .collect(),
                },
            },
            info_hash: None,
        };

        let torrent_path = dir.path().join(format!("{name}.torrent"));
        fs::write(&torrent_path, serde_bencode::to_bytes(&torrent).unwrap()).unwrap();

        Self {
            dir,
            torrent_path,
            name: name.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_path(&self, file: &str) -> PathBuf {
        self.dir.path().join(&self.name).join(file)
    }

    pub fn corrupt(&self, file: &str, offset: usize) {
        let path = self.data_path(file);
        let mut bytes = fs::read(&path).unwrap();
        bytes[offset] = bytes[offset].wrapping_add(1);
        fs::write(&path, bytes).unwrap();
    }
}
