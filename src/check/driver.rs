use std::fs;
use std::io;
use tracing::{debug, info};

use super::{CheckConfig, CheckSummary, FileRange};
use crate::file::FileStorage;
use crate::output::OutputSink;
use crate::piece::{PieceIndex, PieceVerdict, PieceVerifier};

/// Pieces covering `file_index`, found by mapping its first and last byte. Empty files cover no
/// piece and give `None`.
pub fn file_range<S: FileStorage + ?Sized>(storage: &S, file_index: usize) -> Option<FileRange> {
    let size = storage.file_at(file_index).size;
    if size == 0 {
        return None;
    }

    let start = storage.map_file(file_index, 0);
    let end = storage.map_file(file_index, size - 1);
    debug_assert!(start <= end);

    Some(FileRange {
        file_index,
        start,
        end,
    })
}

enum FileState {
    Valid,
    Rejected(Rejection),
}

#[derive(thiserror::Error, Debug)]
enum Rejection {
    #[error("piece {0} is invalid")]
    Piece(PieceIndex),
    #[error("not a regular file on disk")]
    Missing,
    #[error("{actual} bytes on disk, torrent says {expected}")]
    Size { expected: u64, actual: u64 },
}

/// Checks every file in index order and hands the intact ones to `sink`.
///
/// Only errors from the sink itself are returned; a damaged or missing file is just left out.
pub fn verify_torrent<S, O>(
    verifier: &mut PieceVerifier<'_, S>,
    sink: &mut O,
    config: &CheckConfig,
) -> io::Result<CheckSummary>
where
    S: FileStorage + ?Sized,
    O: OutputSink + ?Sized,
{
    let storage = verifier.storage();
    let mut summary = CheckSummary::default();

    for file_index in 0..storage.num_files() {
        let file = storage.file_at(file_index);
        if file.pad {
            continue;
        }
        summary.files += 1;

        match check_file(verifier, sink, config, file_index, summary.valid_files) {
            FileState::Valid => {
                summary.valid_files += 1;
                sink.valid_file(file_index, &file.path)?;
            }
            FileState::Rejected(reason) => {
                debug!(
                    file = file_index,
                    path = %file.path.display(),
                    "file rejected: {}",
                    reason
                );
            }
        }
    }

    summary.pieces_hashed = verifier.pieces_hashed();
    info!(
        files = summary.files,
        valid = summary.valid_files,
        hashed = summary.pieces_hashed,
        "verification finished"
    );
    Ok(summary)
}

fn check_file<S, O>(
    verifier: &mut PieceVerifier<'_, S>,
    sink: &mut O,
    config: &CheckConfig,
    file_index: usize,
    valid_files: usize,
) -> FileState
where
    S: FileStorage + ?Sized,
    O: OutputSink + ?Sized,
{
    let storage = verifier.storage();
    let file = storage.file_at(file_index);

    // Empty files have no piece to vouch for them, so they need to exist at least.
    if config.check_size || file.size == 0 {
        match fs::metadata(verifier.root().join(&file.path)) {
            Ok(meta) if meta.is_file() => {
                if config.check_size && meta.len() != file.size {
                    return FileState::Rejected(Rejection::Size {
                        expected: file.size,
                        actual: meta.len(),
                    });
                }
            }
            _ => return FileState::Rejected(Rejection::Missing),
        }
    }

    let Some(range) = file_range(storage, file_index) else {
        return FileState::Valid;
    };

    for piece in range.pieces() {
        if verifier.verdict(piece) == PieceVerdict::Unknown {
            sink.progress(piece, storage.num_pieces(), valid_files);
        }
        if !verifier.verify(piece) {
            return FileState::Rejected(Rejection::Piece(piece));
        }
    }

    FileState::Valid
}
