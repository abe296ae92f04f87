use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::piece::PieceIndex;

mod reporter;

pub use reporter::Reporter;

/// Receives the result of a run: every intact file, in ascending index order.
pub trait OutputSink {
    fn valid_file(&mut self, file_index: usize, path: &Path) -> io::Result<()>;

    /// Called before an unchecked piece is hashed. Purely informational.
    fn progress(&mut self, _piece: PieceIndex, _num_pieces: u32, _valid_files: usize) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One path per line
    #[default]
    Paths,
    /// Paths terminated by NUL, for `xargs -0` and friends
    NullTerminated,
    /// One file index per line
    Indices,
}

impl OutputFormat {
    pub fn write_entry<W: Write + ?Sized>(
        self,
        out: &mut W,
        file_index: usize,
        path: &Path,
    ) -> io::Result<()> {
        match self {
            OutputFormat::Paths => {
                out.write_all(path.as_os_str().as_encoded_bytes())?;
                out.write_all(b"\n")
            }
            OutputFormat::NullTerminated => {
                out.write_all(path.as_os_str().as_encoded_bytes())?;
                out.write_all(b"\0")
            }
            OutputFormat::Indices => writeln!(out, "{}", file_index),
        }
    }
}

/// Keeps everything in memory. Handy for embedding and tests.
#[derive(Debug, Default)]
pub struct Collector {
    pub files: Vec<(usize, PathBuf)>,
    pub progress: Vec<(PieceIndex, u32, usize)>,
}

impl OutputSink for Collector {
    fn valid_file(&mut self, file_index: usize, path: &Path) -> io::Result<()> {
        self.files.push((file_index, path.to_path_buf()));
        Ok(())
    }

    fn progress(&mut self, piece: PieceIndex, num_pieces: u32, valid_files: usize) {
        self.progress.push((piece, num_pieces, valid_files));
    }
}
