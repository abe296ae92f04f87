//! Finds the files of a partially downloaded torrent whose data is intact, by checking the
//! piece hashes against what is on disk.

pub mod check;
pub mod file;
pub mod output;
pub mod piece;
pub mod torrent;

#[cfg(test)]
mod test_util;

pub use check::{verify_torrent, CheckConfig, CheckSummary};
pub use file::{FileStorage, TorrentLayout};
pub use piece::PieceVerifier;
pub use torrent::Torrent;
